//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Each physical node is represented on the ring by `R` virtual nodes, where
//! `R` is the ring's replication factor. More positions per physical node
//! means a smoother share of the key space per node, and a departing node's
//! load spreads over several neighbours instead of one.
//!
//! # Placement
//!
//! Positions are not hashed. The ring is cut into `R` equal bands of width
//! `CAPACITY / R` and a node lands at the same offset inside every band:
//!
//! ```text
//! position_i = (id mod band) + i * band,   band = CAPACITY / R,   i in [0, R)
//! ```
//!
//! So a node's virtual nodes are spread exactly one per band, whatever the
//! magnitude of its id, and removing a node can recompute its positions from
//! the id alone.
//!
//! When `R` does not divide 2^32 the integer division leaves
//! `CAPACITY mod R` positions at the top of the ring outside every band.
//! Nothing is placed there; keys falling there wrap to the first virtual
//! node. This skew is part of the formula and is kept as is.
//!
//! # Performance Characteristics
//!
//! - **Derivation**: O(R) per physical node, no hashing
//! - **Lookup**: O(log M) for M = N * R virtual nodes

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::ring::position::{Position, CAPACITY};

/// A virtual node on the hash ring.
///
/// Ordered by position first, so a sorted `Vec<VirtualNode>` is in ring
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Position on the ring.
    pub position: Position,

    /// The physical node that owns this virtual node.
    pub node_id: NodeId,

    /// Which of the owner's `R` bands this virtual node sits in.
    pub replica: u32,
}

impl VirtualNode {
    /// Create a new virtual node.
    #[inline]
    pub fn new(position: Position, node_id: NodeId, replica: u32) -> Self {
        Self {
            position,
            node_id,
            replica,
        }
    }

    /// Derive virtual node `replica` of `node_id` on a ring with `replicas`
    /// virtual nodes per physical node.
    ///
    /// # Arguments
    /// * `node_id` - The physical node ID
    /// * `replica` - Band index, must be below `replicas`
    /// * `replicas` - The ring's replication factor
    ///
    /// # Example
    /// ```rust
    /// use corelib::{NodeId, Position, VirtualNode};
    ///
    /// let vnode = VirtualNode::from_index(NodeId(1), 2, 4).unwrap();
    /// assert_eq!(vnode.position, Position(2_147_483_649));
    /// ```
    pub fn from_index(node_id: NodeId, replica: u32, replicas: u32) -> Result<Self> {
        let band = band_width(replicas)?;
        if replica >= replicas {
            return Err(Error::InvalidConfiguration(format!(
                "replica index {replica} out of range for {replicas} replicas"
            )));
        }
        Ok(Self::new(position_in_band(node_id, replica, band), node_id, replica))
    }

    /// Get the position.
    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Get the owning node ID.
    #[inline]
    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    /// Clockwise distance to another virtual node.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u64 {
        self.position.distance_to(other.position)
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VNode(position={}, node={}, replica={})",
            self.position, self.node_id, self.replica
        )
    }
}

/// Width of one placement band for `replicas` virtual nodes per node.
///
/// Fails for zero replicas, where the band would be undefined.
pub fn band_width(replicas: u32) -> Result<u64> {
    if replicas == 0 {
        return Err(Error::InvalidConfiguration(
            "replication factor must be greater than zero".to_string(),
        ));
    }
    Ok(CAPACITY / u64::from(replicas))
}

/// All `replicas` virtual nodes of `node_id`, in ascending position order.
pub fn derive(node_id: NodeId, replicas: u32) -> Result<Vec<VirtualNode>> {
    let band = band_width(replicas)?;
    Ok(derive_in_bands(node_id, replicas, band).collect())
}

/// Same as [`derive`] with the band width already validated.
pub(crate) fn derive_in_bands(
    node_id: NodeId,
    replicas: u32,
    band: u64,
) -> impl Iterator<Item = VirtualNode> {
    (0..replicas).map(move |replica| {
        VirtualNode::new(position_in_band(node_id, replica, band), node_id, replica)
    })
}

#[inline]
fn position_in_band(node_id: NodeId, replica: u32, band: u64) -> Position {
    // offset < band and replica < CAPACITY / band, so the sum stays below 2^32.
    let offset = u64::from(node_id.get()) % band;
    Position((offset + u64::from(replica) * band) as u32)
}
