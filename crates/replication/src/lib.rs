//! Replica placement on top of the consistent hash ring.
//!
//! A replication strategy turns a ring position into a preference list: the
//! physical nodes that should hold copies of whatever lives there, primary
//! first. Strategies only compute placement; moving data between nodes is
//! up to the caller.

pub mod error;
pub mod strategy;

pub use error::ReplicationError;
pub use strategy::{ReplicationStrategy, SimpleStrategy};
