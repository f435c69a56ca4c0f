//! Error types for replica placement.

/// Errors that can occur while computing a preference list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplicationError {
    /// The ring has no virtual nodes to place copies on.
    #[error("cannot place replicas on an empty ring")]
    EmptyRing,

    /// The strategy was configured with an unusable copy count.
    #[error("invalid replication configuration: {0}")]
    InvalidConfiguration(String),

    /// Error reported by the ring.
    #[error(transparent)]
    Ring(#[from] corelib::Error),
}
