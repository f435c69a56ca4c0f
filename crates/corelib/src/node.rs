//! Physical node identity.
//!
//! Physical nodes are the real backing servers behind the ring. The ring only
//! knows them by a compact numeric `NodeId`; names, addresses and health live
//! with whoever embeds the ring.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Compact identifier for a physical node.
///
/// Newtype over `u32` so it lives in the same numeric space as ring
/// positions; the placement formula projects it directly onto the ring.
#[derive(
    Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Returns the raw numeric id.
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}
