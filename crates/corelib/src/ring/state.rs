//! Unlocked ring state.
//!
//! Every operation on the ring lives here as a plain `&self` / `&mut self`
//! method. `HashRing` wraps one `RingState` in a lock and calls into it
//! exactly once per public call, so no code path ever takes the lock twice.

use std::collections::HashMap;

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::ring::position::Position;
use crate::sorted;
use crate::topology::Topology;
use crate::vnode::{self, VirtualNode};

#[derive(Debug, Clone)]
pub(crate) struct RingState {
    /// Virtual nodes per physical node.
    replicas: u32,
    /// Placement band width, `CAPACITY / replicas`.
    band: u64,
    /// Physical nodes in insertion order.
    physical: Vec<NodeId>,
    /// Virtual node positions, ascending. Two nodes may derive the same
    /// position, in which case it appears once per owner.
    vnodes: Vec<Position>,
    /// Virtual position -> owners, in the order they joined.
    owners: HashMap<Position, Vec<VirtualNode>>,
    /// Stored payloads keyed by their hash.
    objects: HashMap<Position, Bytes>,
    /// Keys of `objects`, ascending, each exactly once.
    object_keys: Vec<Position>,
}

impl RingState {
    pub(crate) fn new(replicas: u32, nodes: impl IntoIterator<Item = NodeId>) -> Result<Self> {
        let band = vnode::band_width(replicas)?;
        let mut state = Self {
            replicas,
            band,
            physical: Vec::new(),
            vnodes: Vec::new(),
            owners: HashMap::new(),
            objects: HashMap::new(),
            object_keys: Vec::new(),
        };

        // Collect everything first and sort once.
        for node_id in nodes {
            if state.physical.contains(&node_id) {
                warn!(%node_id, "duplicate node id in initial set ignored");
                continue;
            }
            state.physical.push(node_id);
            for vnode in vnode::derive_in_bands(node_id, replicas, band) {
                state.vnodes.push(vnode.position);
                state.owners.entry(vnode.position).or_default().push(vnode);
            }
        }
        state.vnodes.sort_unstable();

        debug!(
            replicas,
            nodes = state.physical.len(),
            vnodes = state.vnodes.len(),
            "built ring"
        );
        Ok(state)
    }

    pub(crate) fn replicas(&self) -> u32 {
        self.replicas
    }

    // ------------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------------

    pub(crate) fn contains_node(&self, node_id: NodeId) -> bool {
        self.physical.contains(&node_id)
    }

    /// Returns `false` if the node was already a member.
    pub(crate) fn add_node(&mut self, node_id: NodeId) -> bool {
        if self.contains_node(node_id) {
            warn!(%node_id, "node already in ring, ignoring add");
            return false;
        }

        self.physical.push(node_id);
        for vnode in vnode::derive_in_bands(node_id, self.replicas, self.band) {
            sorted::sorted_insert(&mut self.vnodes, vnode.position);
            self.owners.entry(vnode.position).or_default().push(vnode);
        }

        debug!(%node_id, vnodes = self.vnodes.len(), "added node to ring");
        true
    }

    pub(crate) fn remove_node(&mut self, node_id: NodeId) -> Result<()> {
        let index = self
            .physical
            .iter()
            .position(|n| *n == node_id)
            .ok_or(Error::NodeNotFound(node_id))?;
        self.physical.remove(index);

        for vnode in vnode::derive_in_bands(node_id, self.replicas, self.band) {
            sorted::sorted_remove(&mut self.vnodes, &vnode.position).map_err(|_| {
                Error::Internal(format!(
                    "virtual node {} of {node_id} missing from ring",
                    vnode.position
                ))
            })?;
            self.unlink_owner(&vnode)?;
        }

        debug!(%node_id, vnodes = self.vnodes.len(), "removed node from ring");
        Ok(())
    }

    fn unlink_owner(&mut self, vnode: &VirtualNode) -> Result<()> {
        let owners = self.owners.get_mut(&vnode.position).ok_or_else(|| {
            Error::Internal(format!("no owners recorded at {}", vnode.position))
        })?;
        let slot = owners.iter().position(|o| o == vnode).ok_or_else(|| {
            Error::Internal(format!("{vnode} missing from owner table"))
        })?;
        owners.remove(slot);
        if owners.is_empty() {
            self.owners.remove(&vnode.position);
        }
        Ok(())
    }

    pub(crate) fn physical_nodes(&self) -> &[NodeId] {
        &self.physical
    }

    pub(crate) fn virtual_nodes(&self) -> &[Position] {
        &self.vnodes
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    /// First virtual position at or after `position`, wrapping past the top.
    pub(crate) fn successor(&self, position: Position) -> Result<Position> {
        sorted::successor_index(&self.vnodes, &position)
            .map(|index| self.vnodes[index])
            .ok_or(Error::EmptyRing)
    }

    /// Successor virtual node together with its owner.
    ///
    /// When several nodes derived the same position, the earliest to join
    /// owns it.
    pub(crate) fn locate(&self, position: Position) -> Result<VirtualNode> {
        let successor = self.successor(position)?;
        self.owners
            .get(&successor)
            .and_then(|owners| owners.first())
            .copied()
            .ok_or_else(|| Error::Internal(format!("virtual node {successor} has no owner")))
    }

    pub(crate) fn topology(&self) -> Topology {
        let mut vnodes = Vec::with_capacity(self.vnodes.len());
        let mut last = None;
        for &position in &self.vnodes {
            if last == Some(position) {
                continue;
            }
            last = Some(position);
            if let Some(owners) = self.owners.get(&position) {
                vnodes.extend_from_slice(owners);
            }
        }
        Topology::from_sorted(vnodes)
    }

    // ------------------------------------------------------------------------
    // Objects
    // ------------------------------------------------------------------------

    /// Stores `payload` at `key`, replacing any payload already there.
    pub(crate) fn add_object(&mut self, key: Position, payload: Bytes) {
        let len = payload.len();
        if self.objects.insert(key, payload).is_none() {
            sorted::sorted_insert(&mut self.object_keys, key);
            trace!(%key, len, "stored object");
        } else {
            trace!(%key, len, "overwrote object");
        }
    }

    pub(crate) fn get_object(&self, key: Position) -> Result<(Bytes, usize)> {
        let payload = self.objects.get(&key).ok_or(Error::KeyNotFound(key))?;
        Ok((payload.clone(), sorted::lower_bound(&self.object_keys, &key)))
    }

    pub(crate) fn contains_object(&self, key: Position) -> bool {
        self.objects.contains_key(&key)
    }

    pub(crate) fn delete_object(&mut self, key: Position) -> Result<()> {
        self.objects.remove(&key).ok_or(Error::KeyNotFound(key))?;
        sorted::sorted_remove(&mut self.object_keys, &key)
            .map_err(|_| Error::Internal(format!("object {key} missing from key list")))?;
        trace!(%key, "deleted object");
        Ok(())
    }

    pub(crate) fn object_keys(&self) -> &[Position] {
        &self.object_keys
    }

    /// Every stored object paired with the virtual node it is assigned to.
    pub(crate) fn assign_objects(&self) -> Result<Vec<(Position, Position)>> {
        self.object_keys
            .iter()
            .map(|&key| Ok((key, self.successor(key)?)))
            .collect()
    }
}
