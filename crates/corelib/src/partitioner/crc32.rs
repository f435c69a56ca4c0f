//! CRC32 (IEEE) partitioner.

use crate::partitioner::traits::Partitioner;
use crate::ring::Position;

/// CRC32 partitioner, the IEEE polynomial via `crc32fast`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Crc32Partitioner;

impl Partitioner for Crc32Partitioner {
    fn partition(&self, key: &[u8]) -> Position {
        Position(crc32fast::hash(key))
    }

    fn name(&self) -> &'static str {
        "Crc32Partitioner"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_checksum() {
        // Standard CRC-32/ISO-HDLC check value.
        assert_eq!(Crc32Partitioner.partition(b"123456789"), Position(0xCBF4_3926));
    }
}
