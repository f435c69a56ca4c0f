//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting object payloads into
//! positions that can be placed on the hash ring.

pub mod crc32;
pub mod sip;
pub mod traits;
pub mod xxh3;

pub use crc32::Crc32Partitioner;
pub use sip::SipPartitioner;
pub use traits::Partitioner;
pub use xxh3::Xxh3Partitioner;
