//! Concurrent readers and writers sharing one ring.

use std::sync::Arc;

use corelib::{HashRing, NodeId, Position};
use crossbeam::thread;

fn shared_ring(nodes: impl IntoIterator<Item = u32>) -> Arc<HashRing<fn(&[u8]) -> u32>> {
    Arc::new(
        HashRing::new(
            crc32fast::hash as fn(&[u8]) -> u32,
            8,
            nodes.into_iter().map(NodeId),
        )
        .unwrap(),
    )
}

#[test]
fn test_concurrent_readers() {
    let ring = shared_ring(0..32);
    let expected = ring.virtual_nodes();

    thread::scope(|s| {
        for t in 0..8u32 {
            let ring = Arc::clone(&ring);
            let expected = expected.clone();
            s.spawn(move |_| {
                for i in 0..1_000u32 {
                    let probe = Position(i.wrapping_mul(2_654_435_761).wrapping_add(t));
                    let vnode = ring.assign_object_to_node(probe).unwrap();
                    assert!(expected.binary_search(&vnode).is_ok());
                }
            });
        }
    })
    .unwrap();
}

#[test]
fn test_readers_never_see_partial_membership_change() {
    let replicas = 8usize;
    let ring = shared_ring(0..4);

    thread::scope(|s| {
        let writer = Arc::clone(&ring);
        s.spawn(move |_| {
            for id in 100..300u32 {
                writer.add_node(NodeId(id));
                if id % 3 == 0 {
                    writer.remove_node(NodeId(id)).unwrap();
                }
            }
        });

        for _ in 0..4 {
            let reader = Arc::clone(&ring);
            s.spawn(move |_| {
                for _ in 0..500 {
                    let vnodes = reader.virtual_nodes();
                    assert!(vnodes.windows(2).all(|w| w[0] <= w[1]), "unsorted snapshot");
                    assert_eq!(vnodes.len() % replicas, 0, "half-applied membership change");

                    let topology = reader.topology();
                    assert_eq!(topology.len() % replicas, 0);
                    assert!(reader.assign_object_to_node(Position(12345)).is_ok());
                }
            });
        }
    })
    .unwrap();

    let live = ring.node_count();
    assert_eq!(ring.vnode_count(), live * replicas);
    assert_eq!(live, 4 + 200 - (100..300).filter(|id| id % 3 == 0).count());
}

#[test]
fn test_concurrent_object_writers() {
    let ring = shared_ring(0..4);

    thread::scope(|s| {
        for t in 0..8u32 {
            let ring = Arc::clone(&ring);
            s.spawn(move |_| {
                for i in 0..100u32 {
                    let payload = format!("writer-{t}-object-{i}");
                    let key = ring.add_object(payload.clone().into_bytes());
                    let (stored, _) = ring.get_object(key).unwrap();
                    // Another writer may have landed on the same hash.
                    if stored == payload.as_bytes() {
                        assert!(ring.contains_object(key));
                    }
                }
            });
        }
    })
    .unwrap();

    let keys = ring.object_keys();
    assert!(keys.windows(2).all(|w| w[0] < w[1]), "object keys sorted and unique");
    assert_eq!(keys.len(), ring.object_count());
}
