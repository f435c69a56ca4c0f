//! Error types for the core library.

use crate::node::NodeId;
use crate::ring::Position;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No object is stored at the given position.
    #[error("key not found: {0}")]
    KeyNotFound(Position),

    /// The physical node is not a member of the ring.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// A successor lookup was made on a ring with no virtual nodes.
    #[error("ring has no virtual nodes")]
    EmptyRing,

    /// The ring cannot be built with the given parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Ring state no longer satisfies one of its invariants.
    ///
    /// This is a bug in the ring itself, never a caller mistake.
    #[error("internal error: {0}")]
    Internal(String),
}
