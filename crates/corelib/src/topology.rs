//! Ring topology snapshots.
//!
//! A `Topology` is an immutable copy of the ring's virtual-node layout with
//! owners attached. It answers routing, ownership and range questions
//! without holding the ring's lock, and is what the replication crate walks.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::ring::position::{Position, CAPACITY};
use crate::vnode::VirtualNode;

/// The arc of the ring a virtual node is responsible for.
///
/// Covers the positions in `(start, end]`, wrapping past the top of the
/// ring when `start >= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRange {
    /// Position of the preceding virtual node (exclusive).
    pub start: Position,
    /// Position of the owning virtual node (inclusive).
    pub end: Position,
    /// Physical owner of the range.
    pub node_id: NodeId,
    /// Number of positions covered.
    pub span: u64,
}

impl TokenRange {
    /// True if `position` falls inside this range.
    pub fn contains(&self, position: Position) -> bool {
        if self.span == 0 {
            return false;
        }
        if self.span == CAPACITY {
            return true;
        }
        let offset = self.start.distance_to(position);
        offset != 0 && offset <= self.span
    }
}

/// Point-in-time view of the virtual nodes on a ring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    /// Ascending by position. Owners sharing a position keep join order, the
    /// first one being the one lookups resolve to.
    vnodes: Vec<VirtualNode>,
}

impl Topology {
    pub(crate) fn from_sorted(vnodes: Vec<VirtualNode>) -> Self {
        debug_assert!(vnodes.windows(2).all(|w| w[0].position <= w[1].position));
        Self { vnodes }
    }

    /// Number of virtual nodes.
    pub fn len(&self) -> usize {
        self.vnodes.len()
    }

    /// True if no virtual nodes exist.
    pub fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    /// All virtual nodes in ring order.
    pub fn vnodes(&self) -> &[VirtualNode] {
        &self.vnodes
    }

    fn successor_index(&self, position: Position) -> Option<usize> {
        if self.vnodes.is_empty() {
            return None;
        }
        let index = self.vnodes.partition_point(|v| v.position < position);
        Some(if index == self.vnodes.len() { 0 } else { index })
    }

    /// The virtual node `position` is assigned to.
    pub fn successor(&self, position: Position) -> Result<VirtualNode> {
        self.successor_index(position)
            .map(|index| self.vnodes[index])
            .ok_or(Error::EmptyRing)
    }

    /// The physical node `position` is assigned to.
    pub fn owner(&self, position: Position) -> Result<NodeId> {
        self.successor(position).map(|v| v.node_id)
    }

    /// Every virtual node once, clockwise, starting at the successor of
    /// `position`.
    pub fn walk(&self, position: Position) -> impl Iterator<Item = &VirtualNode> + '_ {
        let start = self.successor_index(position).unwrap_or(0);
        let (before, after) = self.vnodes.split_at(start);
        after.iter().chain(before.iter())
    }

    /// The range owned by each virtual node, in ring order.
    ///
    /// Spans sum to 2^32 for a non-empty topology. A virtual node that shares
    /// its position with an earlier owner covers nothing.
    pub fn ranges(&self) -> Vec<TokenRange> {
        let len = self.vnodes.len();
        self.vnodes
            .iter()
            .enumerate()
            .map(|(i, vnode)| {
                let prev = self.vnodes[(i + len - 1) % len];
                let mut span = prev.position.distance_to(vnode.position);
                let first_at_position = i == 0 || prev.position != vnode.position;
                if span == 0 && first_at_position {
                    // Every virtual node sits on the same position.
                    span = CAPACITY;
                }
                TokenRange {
                    start: prev.position,
                    end: vnode.position,
                    node_id: vnode.node_id,
                    span,
                }
            })
            .collect()
    }

    /// Positions owned by each physical node.
    ///
    /// Nodes whose every virtual node is shadowed by another owner appear
    /// with zero.
    pub fn ownership(&self) -> BTreeMap<NodeId, u64> {
        let mut owned = BTreeMap::new();
        for range in self.ranges() {
            *owned.entry(range.node_id).or_insert(0) += range.span;
        }
        owned
    }

    /// Distinct physical nodes, in order of their first virtual node.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        for vnode in &self.vnodes {
            if !nodes.contains(&vnode.node_id) {
                nodes.push(vnode.node_id);
            }
        }
        nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topo(entries: &[(u32, u32)]) -> Topology {
        Topology::from_sorted(
            entries
                .iter()
                .map(|&(pos, id)| VirtualNode::new(Position(pos), NodeId(id), 0))
                .collect(),
        )
    }

    #[test]
    fn test_successor_and_owner() {
        let t = topo(&[(10, 1), (20, 2), (30, 3)]);
        assert_eq!(t.owner(Position(0)).unwrap(), NodeId(1));
        assert_eq!(t.owner(Position(20)).unwrap(), NodeId(2));
        assert_eq!(t.owner(Position(25)).unwrap(), NodeId(3));
        assert_eq!(t.owner(Position(31)).unwrap(), NodeId(1));
        assert_eq!(Topology::default().owner(Position(0)), Err(Error::EmptyRing));
    }

    #[test]
    fn test_walk_wraps() {
        let t = topo(&[(10, 1), (20, 2), (30, 3)]);
        let order: Vec<u32> = t.walk(Position(25)).map(|v| v.node_id.get()).collect();
        assert_eq!(order, vec![3, 1, 2]);
        assert_eq!(Topology::default().walk(Position(3)).count(), 0);
    }

    #[test]
    fn test_ranges_cover_ring() {
        let t = topo(&[(10, 1), (20, 2), (30, 1)]);
        let ranges = t.ranges();
        assert_eq!(ranges[0].span, CAPACITY - 20);
        assert_eq!(ranges[1].span, 10);
        assert_eq!(ranges[2].span, 10);
        assert_eq!(ranges.iter().map(|r| r.span).sum::<u64>(), CAPACITY);

        assert!(ranges[0].contains(Position(u32::MAX)));
        assert!(ranges[0].contains(Position(10)));
        assert!(!ranges[0].contains(Position(11)));
        assert!(ranges[1].contains(Position(20)));
        assert!(!ranges[1].contains(Position(10)));
    }

    #[test]
    fn test_ownership() {
        let t = topo(&[(10, 1), (20, 2), (30, 1)]);
        let owned = t.ownership();
        assert_eq!(owned[&NodeId(1)], CAPACITY - 10);
        assert_eq!(owned[&NodeId(2)], 10);
    }

    #[test]
    fn test_single_position_owns_everything() {
        let t = topo(&[(5, 1), (5, 2)]);
        let owned = t.ownership();
        assert_eq!(owned[&NodeId(1)], CAPACITY);
        assert_eq!(owned[&NodeId(2)], 0);
        assert_eq!(t.nodes(), vec![NodeId(1), NodeId(2)]);
    }
}
