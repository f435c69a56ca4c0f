//! XXH3 partitioner.

use crate::partitioner::traits::Partitioner;
use crate::ring::Position;
use xxhash_rust::xxh3::xxh3_64;

/// XXH3-64 truncated to its low 32 bits.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Partitioner for Xxh3Partitioner {
    fn partition(&self, key: &[u8]) -> Position {
        Position(xxh3_64(key) as u32)
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}
