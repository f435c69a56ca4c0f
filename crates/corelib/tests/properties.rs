//! Property tests over random membership and object histories.

use std::collections::HashSet;

use corelib::sorted::sorted_insert;
use corelib::vnode::derive;
use corelib::{Error, HashRing, NodeId, Position, CAPACITY};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(u32),
    Remove(u32),
}

fn op() -> impl Strategy<Value = Op> {
    // A small id space so removals often hit live nodes.
    prop_oneof![
        (0u32..64).prop_map(Op::Add),
        (0u32..64).prop_map(Op::Remove),
        any::<u32>().prop_map(Op::Add),
    ]
}

fn ring(replicas: u32, nodes: &[u32]) -> HashRing<fn(&[u8]) -> u32> {
    HashRing::new(
        crc32fast::hash as fn(&[u8]) -> u32,
        replicas,
        nodes.iter().copied().map(NodeId),
    )
    .unwrap()
}

fn is_sorted(seq: &[Position]) -> bool {
    seq.windows(2).all(|w| w[0] <= w[1])
}

proptest! {
    /// Property: every live node contributes exactly R virtual nodes and the
    /// list stays sorted through any add/remove history.
    #[test]
    fn prop_membership_invariants(
        replicas in 1u32..16,
        initial in prop::collection::vec(any::<u32>(), 0..8),
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let ring = ring(replicas, &initial);
        prop_assert!(is_sorted(&ring.virtual_nodes()));

        for op in ops {
            match op {
                Op::Add(id) => {
                    ring.add_node(NodeId(id));
                }
                Op::Remove(id) => {
                    let was_member = ring.contains_node(NodeId(id));
                    let result = ring.remove_node(NodeId(id));
                    if was_member {
                        prop_assert!(result.is_ok());
                    } else {
                        prop_assert_eq!(result, Err(Error::NodeNotFound(NodeId(id))));
                    }
                }
            }
            let vnodes = ring.virtual_nodes();
            prop_assert!(is_sorted(&vnodes));
            prop_assert_eq!(vnodes.len(), ring.physical_nodes().len() * replicas as usize);
        }
    }

    /// Property: removing a node removes exactly its derived positions.
    #[test]
    fn prop_remove_takes_derived_positions(
        replicas in 1u32..12,
        nodes in prop::collection::hash_set(any::<u32>(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let nodes: Vec<u32> = nodes.into_iter().collect();
        let ring = ring(replicas, &nodes);
        let victim = NodeId(nodes[pick.index(nodes.len())]);

        let mut before = ring.virtual_nodes();
        ring.remove_node(victim).unwrap();
        let after = ring.virtual_nodes();
        prop_assert_eq!(before.len() - after.len(), replicas as usize);

        for vnode in derive(victim, replicas).unwrap() {
            let at = before.iter().position(|p| *p == vnode.position);
            prop_assert!(at.is_some());
            before.remove(at.unwrap());
        }
        prop_assert_eq!(before, after);
    }

    /// Property: assignment is the smallest virtual node >= p, or the
    /// minimum when none is.
    #[test]
    fn prop_assignment_is_successor(
        replicas in 1u32..8,
        nodes in prop::collection::vec(any::<u32>(), 1..10),
        probe in any::<u32>(),
    ) {
        let ring = ring(replicas, &nodes);
        let vnodes = ring.virtual_nodes();
        let assigned = ring.assign_object_to_node(Position(probe)).unwrap();

        prop_assert!(vnodes.contains(&assigned));
        match vnodes.iter().find(|p| p.get() >= probe) {
            Some(expected) => prop_assert_eq!(assigned, *expected),
            None => prop_assert_eq!(assigned, vnodes[0]),
        }
    }

    /// Property: payloads read back as written until deleted.
    #[test]
    fn prop_object_round_trip(
        payloads in prop::collection::vec(prop::collection::vec(any::<u8>(), 0..32), 1..20),
    ) {
        let ring = ring(4, &[1, 2, 3]);
        let mut latest = std::collections::HashMap::new();
        for payload in &payloads {
            let key = ring.add_object(payload.clone());
            latest.insert(key, payload.clone());
        }
        prop_assert_eq!(ring.object_count(), latest.len());

        for (key, payload) in &latest {
            let (stored, _) = ring.get_object(*key).unwrap();
            prop_assert_eq!(&stored[..], &payload[..]);
        }

        let keys: HashSet<Position> = latest.keys().copied().collect();
        for key in keys {
            ring.delete_object(key).unwrap();
            prop_assert_eq!(ring.get_object(key), Err(Error::KeyNotFound(key)));
        }
        prop_assert_eq!(ring.object_count(), 0);
    }

    /// Property: topology ownership always covers the whole ring.
    #[test]
    fn prop_ownership_covers_ring(
        replicas in 1u32..8,
        nodes in prop::collection::vec(any::<u32>(), 1..10),
    ) {
        let ring = ring(replicas, &nodes);
        let total: u64 = ring.topology().ownership().values().sum();
        prop_assert_eq!(total, CAPACITY);
    }

    /// Property: sorted insert keeps any sequence ascending.
    #[test]
    fn prop_sorted_insert(values in prop::collection::vec(any::<u32>(), 0..64)) {
        let mut seq = Vec::new();
        for value in &values {
            let at = sorted_insert(&mut seq, *value);
            prop_assert_eq!(seq[at], *value);
        }
        let mut expected = values.clone();
        expected.sort_unstable();
        prop_assert_eq!(seq, expected);
    }
}
