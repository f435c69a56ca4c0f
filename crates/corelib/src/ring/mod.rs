//! Consistent hash ring implementation.
//!
//! The ring manages virtual-node positions and stored objects and provides
//! successor lookup for finding the node responsible for a key.

pub mod position;
#[allow(clippy::module_inception)]
pub mod ring;
mod state;

pub use position::{Position, CAPACITY};
pub use ring::{HashRing, RingBuilder};

/// Alias for the main ring type (used by lib.rs).
pub type Ring<P = crate::partitioner::Xxh3Partitioner> = HashRing<P>;
