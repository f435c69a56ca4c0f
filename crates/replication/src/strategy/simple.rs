//! Simple replication strategy.
//!
//! Places copies on consecutive distinct physical nodes around the ring,
//! clockwise from the position's successor.
//!
//! # Algorithm
//!
//! 1. Find the primary: the owner of the successor virtual node
//! 2. Continue clockwise, skipping virtual nodes of nodes already chosen
//! 3. Stop at `copies` nodes or after one full turn
//!
//! # Performance
//!
//! - **Time**: O(log M + M) worst case for M virtual nodes; typically the
//!   walk stops after a handful of steps
//! - **Space**: O(copies)
//!
//! # Limitations
//!
//! - Nodes are anonymous ids, so there is no rack or data-center awareness

use tracing::trace;

use crate::error::ReplicationError;
use crate::strategy::ReplicationStrategy;
use corelib::{NodeId, Position, Topology};

/// Copies placed on the next distinct physical nodes clockwise.
///
/// # Example
///
/// ```rust
/// use corelib::{HashRing, NodeId};
/// use replication::{ReplicationStrategy, SimpleStrategy};
///
/// let ring = HashRing::new(crc32fast::hash, 4, [NodeId(1), NodeId(2), NodeId(3)]).unwrap();
/// let strategy = SimpleStrategy::new(2).unwrap();
///
/// let replicas = strategy.replicas_for_key(&ring, b"my-key").unwrap();
/// assert_eq!(replicas.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SimpleStrategy {
    /// Number of distinct nodes to place copies on (including the primary).
    copies: usize,
}

impl SimpleStrategy {
    /// Create a strategy placing `copies` copies.
    ///
    /// Zero copies is rejected.
    pub fn new(copies: usize) -> Result<Self, ReplicationError> {
        if copies == 0 {
            return Err(ReplicationError::InvalidConfiguration(
                "copies must be greater than zero".to_string(),
            ));
        }
        Ok(Self { copies })
    }
}

impl Default for SimpleStrategy {
    /// Three copies: primary plus two.
    fn default() -> Self {
        Self { copies: 3 }
    }
}

impl ReplicationStrategy for SimpleStrategy {
    fn copies(&self) -> usize {
        self.copies
    }

    fn replicas_for_position(
        &self,
        topology: &Topology,
        position: Position,
    ) -> Result<Vec<NodeId>, ReplicationError> {
        if topology.is_empty() {
            return Err(ReplicationError::EmptyRing);
        }

        let mut replicas = Vec::with_capacity(self.copies);
        for vnode in topology.walk(position) {
            if replicas.contains(&vnode.node_id) {
                continue;
            }
            replicas.push(vnode.node_id);
            if replicas.len() == self.copies {
                break;
            }
        }

        trace!(%position, ?replicas, "computed preference list");
        Ok(replicas)
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}
