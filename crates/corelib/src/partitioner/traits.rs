//! Core partitioner trait definitions.

use crate::ring::Position;

/// A partitioner converts object payloads into positions on the hash ring.
///
/// The ring never hashes anything itself; the embedding application picks the
/// partitioner. Any `Fn(&[u8]) -> u32` closure or function pointer is a
/// partitioner, so `crc32fast::hash` can be handed to a ring directly.
///
/// Partitioners are stateless and thread-safe, allowing concurrent position
/// computation without synchronization overhead.
pub trait Partitioner: Send + Sync + 'static {
    /// Converts a payload into a ring position.
    fn partition(&self, key: &[u8]) -> Position;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}

impl<F> Partitioner for F
where
    F: Fn(&[u8]) -> u32 + Send + Sync + 'static,
{
    fn partition(&self, key: &[u8]) -> Position {
        Position(self(key))
    }

    fn name(&self) -> &'static str {
        "CustomPartitioner"
    }
}
