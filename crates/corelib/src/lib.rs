//! Core library for consistent hashing implementation.
//!
//! This crate provides the consistent hash ring and its building blocks:
//! - Ring positions on a fixed 2^32 key space
//! - Sorted-sequence helpers shared by every ordered list in the ring
//! - Deterministic virtual-node placement
//! - Partitioners (hash providers) turning payloads into positions
//! - The ring itself: membership, object store, successor lookup
//! - Topology snapshots for ownership and range analysis

pub mod config;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod sorted;
pub mod topology;
pub mod vnode;

pub use config::{RingConfig, DEFAULT_REPLICAS};
pub use error::{Error, Result};
pub use node::NodeId;
pub use partitioner::Partitioner;
pub use ring::{HashRing, Position, Ring, RingBuilder, CAPACITY};
pub use topology::{TokenRange, Topology};
pub use vnode::VirtualNode;
