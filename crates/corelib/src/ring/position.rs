//! Ring position implementation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of distinct positions on the ring (2^32).
pub const CAPACITY: u64 = 1 << 32;

/// A point on the consistent hash ring.
///
/// Positions are plain `u32` values ordered numerically; the ring closes by
/// wrapping from `u32::MAX` back to zero.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Position(pub u32);

impl Position {
    /// The first position on the ring.
    pub const MIN: Position = Position(0);

    /// The last position on the ring.
    pub const MAX: Position = Position(u32::MAX);

    /// Returns the raw numeric value.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }

    /// True if this is the first position on the ring.
    #[inline]
    pub fn is_minimum(self) -> bool {
        self == Self::MIN
    }

    /// True if this is the last position on the ring.
    #[inline]
    pub fn is_maximum(self) -> bool {
        self == Self::MAX
    }

    /// Clockwise distance from `self` to `other`.
    ///
    /// Returned as `u64` so a full turn (2^32) is representable; a position's
    /// distance to itself is zero.
    #[inline]
    pub fn distance_to(self, other: Position) -> u64 {
        if other.0 >= self.0 {
            u64::from(other.0 - self.0)
        } else {
            CAPACITY - u64::from(self.0) + u64::from(other.0)
        }
    }
}

impl From<u32> for Position {
    fn from(value: u32) -> Self {
        Position(value)
    }
}

impl From<Position> for u32 {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
