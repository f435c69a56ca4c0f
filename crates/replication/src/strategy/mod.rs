//! Replication strategy abstractions.
//!
//! Replication strategies determine how many copies to keep and which
//! physical nodes hold them.
//!
//! - **SimpleStrategy**: copies on the next distinct nodes clockwise

pub mod simple;

pub use simple::SimpleStrategy;

use corelib::{HashRing, NodeId, Partitioner, Position, Topology};

use crate::error::ReplicationError;

/// Trait for replication strategies.
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as they may be
/// shared across threads.
pub trait ReplicationStrategy: Send + Sync + 'static {
    /// Number of distinct physical nodes a full preference list holds.
    ///
    /// Unrelated to the ring's own replication factor, which counts virtual
    /// nodes per physical node.
    fn copies(&self) -> usize;

    /// Preference list for `position`, primary owner first.
    ///
    /// Shorter than [`copies`](Self::copies) when the ring has fewer
    /// physical nodes.
    fn replicas_for_position(
        &self,
        topology: &Topology,
        position: Position,
    ) -> Result<Vec<NodeId>, ReplicationError>;

    /// Preference list for a payload, hashed with the ring's partitioner.
    fn replicas_for_key<P: Partitioner>(
        &self,
        ring: &HashRing<P>,
        key: &[u8],
    ) -> Result<Vec<NodeId>, ReplicationError>
    where
        Self: Sized,
    {
        self.replicas_for_position(&ring.topology(), ring.position_of(key))
    }

    /// Get the strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
