//! The hash ring and its builder.

use std::fmt;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::config::{RingConfig, DEFAULT_REPLICAS};
use crate::error::Result;
use crate::node::NodeId;
use crate::partitioner::{Partitioner, Xxh3Partitioner};
use crate::ring::position::Position;
use crate::ring::state::RingState;
use crate::topology::Topology;
use crate::vnode::VirtualNode;

/// A consistent hash ring over the 2^32 position space.
///
/// Holds the physical nodes, their virtual nodes, and an object store keyed
/// by payload hash. One reader/writer lock guards all of it: mutations take
/// the lock exclusively for their whole duration, lookups share it.
///
/// The ring is an ordinary value. Share it between threads with `Arc`.
///
/// # Example
///
/// ```rust
/// use corelib::{HashRing, NodeId};
///
/// let ring = HashRing::new(crc32fast::hash, 4, [NodeId(0), NodeId(1)]).unwrap();
/// let key = ring.add_object(&b"hello"[..]);
/// let vnode = ring.assign_object_to_node(key).unwrap();
/// assert!(ring.virtual_nodes().contains(&vnode));
/// ```
pub struct HashRing<P = Xxh3Partitioner> {
    partitioner: P,
    state: RwLock<RingState>,
}

impl<P: Partitioner> HashRing<P> {
    /// Builds a ring with `replicas` virtual nodes per physical node.
    ///
    /// Fails with `InvalidConfiguration` when `replicas` is zero. Duplicate
    /// ids in `nodes` are kept once.
    pub fn new(
        partitioner: P,
        replicas: u32,
        nodes: impl IntoIterator<Item = NodeId>,
    ) -> Result<Self> {
        Ok(Self {
            partitioner,
            state: RwLock::new(RingState::new(replicas, nodes)?),
        })
    }

    /// Builds a ring from deserialized parameters.
    pub fn from_config(partitioner: P, config: &RingConfig) -> Result<Self> {
        config.validate()?;
        Self::new(partitioner, config.replicas, config.nodes.iter().copied())
    }

    /// Virtual nodes per physical node.
    pub fn replicas(&self) -> u32 {
        self.state.read().replicas()
    }

    /// Returns the name of the partitioner.
    pub fn partitioner_name(&self) -> &'static str {
        self.partitioner.name()
    }

    /// Ring position of `payload` under this ring's partitioner.
    pub fn position_of(&self, payload: &[u8]) -> Position {
        self.partitioner.partition(payload)
    }

    // ------------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------------

    /// Adds a physical node and its virtual nodes.
    ///
    /// Adding an id that is already a member changes nothing and returns
    /// `false`.
    pub fn add_node(&self, node_id: NodeId) -> bool {
        self.state.write().add_node(node_id)
    }

    /// Removes a physical node and its virtual nodes.
    ///
    /// The remaining physical nodes keep their relative order. Stored
    /// objects are not touched.
    pub fn remove_node(&self, node_id: NodeId) -> Result<()> {
        self.state.write().remove_node(node_id)
    }

    /// True if `node_id` is a member.
    pub fn contains_node(&self, node_id: NodeId) -> bool {
        self.state.read().contains_node(node_id)
    }

    /// Physical nodes in insertion order.
    pub fn physical_nodes(&self) -> Vec<NodeId> {
        self.state.read().physical_nodes().to_vec()
    }

    /// Virtual node positions in ring order.
    pub fn virtual_nodes(&self) -> Vec<Position> {
        self.state.read().virtual_nodes().to_vec()
    }

    /// Number of physical nodes.
    pub fn node_count(&self) -> usize {
        self.state.read().physical_nodes().len()
    }

    /// Number of virtual nodes.
    pub fn vnode_count(&self) -> usize {
        self.state.read().virtual_nodes().len()
    }

    /// Snapshot of the virtual-node layout with owners.
    pub fn topology(&self) -> Topology {
        self.state.read().topology()
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// The virtual node responsible for `position`: the first one at or
    /// after it, wrapping to the smallest past the top of the ring.
    pub fn assign_object_to_node(&self, position: Position) -> Result<Position> {
        self.state.read().successor(position)
    }

    /// The physical node owning the virtual node `position` is assigned to.
    pub fn assign_object_to_physical_node(&self, position: Position) -> Result<NodeId> {
        self.locate(position).map(|vnode| vnode.node_id)
    }

    /// The virtual node `position` is assigned to, with its owner.
    pub fn locate(&self, position: Position) -> Result<VirtualNode> {
        self.state.read().locate(position)
    }

    // ------------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------------

    /// Stores `payload` under its hash and returns that hash as its key.
    ///
    /// A payload hashing to an occupied key replaces the one stored there.
    pub fn add_object(&self, payload: impl Into<Bytes>) -> Position {
        let payload = payload.into();
        let key = self.partitioner.partition(&payload);
        self.state.write().add_object(key, payload);
        key
    }

    /// The payload stored at `key`, and the key's current index among all
    /// stored keys in ascending order.
    ///
    /// The index shifts as objects come and go; it is not an identifier.
    pub fn get_object(&self, key: Position) -> Result<(Bytes, usize)> {
        self.state.read().get_object(key)
    }

    /// True if an object is stored at `key`.
    pub fn contains_object(&self, key: Position) -> bool {
        self.state.read().contains_object(key)
    }

    /// Removes the object stored at `key`.
    pub fn delete_object(&self, key: Position) -> Result<()> {
        self.state.write().delete_object(key)
    }

    /// Number of stored objects.
    pub fn object_count(&self) -> usize {
        self.state.read().object_keys().len()
    }

    /// Keys of all stored objects, ascending.
    pub fn object_keys(&self) -> Vec<Position> {
        self.state.read().object_keys().to_vec()
    }

    /// Every stored object key paired with the virtual node it is assigned
    /// to under the current membership.
    pub fn assign_objects(&self) -> Result<Vec<(Position, Position)>> {
        self.state.read().assign_objects()
    }
}

impl<P: Partitioner> fmt::Debug for HashRing<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("HashRing")
            .field("partitioner", &self.partitioner.name())
            .field("replicas", &state.replicas())
            .field("nodes", &state.physical_nodes().len())
            .field("vnodes", &state.virtual_nodes().len())
            .field("objects", &state.object_keys().len())
            .finish()
    }
}

/// Builder for [`HashRing`].
///
/// Defaults to 8 virtual nodes per physical node and the XXH3 partitioner.
#[derive(Debug, Clone)]
pub struct RingBuilder<P = Xxh3Partitioner> {
    partitioner: P,
    replicas: u32,
    nodes: Vec<NodeId>,
}

impl RingBuilder<Xxh3Partitioner> {
    pub fn new() -> Self {
        Self {
            partitioner: Xxh3Partitioner,
            replicas: DEFAULT_REPLICAS,
            nodes: Vec::new(),
        }
    }
}

impl Default for RingBuilder<Xxh3Partitioner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Partitioner> RingBuilder<P> {
    /// Sets the number of virtual nodes per physical node.
    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.replicas = replicas;
        self
    }

    /// Replaces the partitioner.
    pub fn with_partitioner<Q: Partitioner>(self, partitioner: Q) -> RingBuilder<Q> {
        RingBuilder {
            partitioner,
            replicas: self.replicas,
            nodes: self.nodes,
        }
    }

    /// Takes replicas and nodes from `config`; nodes are appended.
    pub fn with_config(mut self, config: &RingConfig) -> Self {
        self.replicas = config.replicas;
        self.nodes.extend(config.nodes.iter().copied());
        self
    }

    pub fn add_node(mut self, node_id: NodeId) -> Self {
        self.nodes.push(node_id);
        self
    }

    pub fn add_nodes(mut self, nodes: impl IntoIterator<Item = NodeId>) -> Self {
        self.nodes.extend(nodes);
        self
    }

    pub fn build(self) -> Result<HashRing<P>> {
        HashRing::new(self.partitioner, self.replicas, self.nodes)
    }
}
