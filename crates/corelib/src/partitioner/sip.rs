//! SipHash partitioner.

use crate::partitioner::traits::Partitioner;
use crate::ring::Position;
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// SipHash-1-3 truncated to its low 32 bits.
///
/// Keyed, so rings sharing a key agree on placement while outsiders cannot
/// aim payloads at a chosen position.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipPartitioner {
    k0: u64,
    k1: u64,
}

impl SipPartitioner {
    /// Creates a partitioner with the given 128-bit key.
    pub fn with_keys(k0: u64, k1: u64) -> Self {
        Self { k0, k1 }
    }
}

impl Partitioner for SipPartitioner {
    fn partition(&self, key: &[u8]) -> Position {
        let mut hasher = SipHasher13::new_with_keys(self.k0, self.k1);
        hasher.write(key);
        Position(hasher.finish() as u32)
    }

    fn name(&self) -> &'static str {
        "SipPartitioner"
    }
}
