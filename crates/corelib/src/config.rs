//! Ring configuration.
//!
//! Everything the ring needs besides its partitioner: the replication factor
//! and the initial membership. The capacity is fixed at 2^32 and is not
//! configurable.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::node::NodeId;

/// Virtual nodes per physical node when none is configured.
pub const DEFAULT_REPLICAS: u32 = 8;

/// Deserializable ring parameters.
///
/// ```json
/// { "replicas": 4, "nodes": [0, 1, 4294967295] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RingConfig {
    /// Virtual nodes per physical node (the ring's replication factor).
    #[serde(default = "default_replicas")]
    pub replicas: u32,
    /// Initial physical nodes, in insertion order.
    #[serde(default)]
    pub nodes: Vec<NodeId>,
}

fn default_replicas() -> u32 {
    DEFAULT_REPLICAS
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            replicas: DEFAULT_REPLICAS,
            nodes: Vec::new(),
        }
    }
}

impl RingConfig {
    /// Checks the parameters without building a ring.
    pub fn validate(&self) -> Result<()> {
        if self.replicas == 0 {
            return Err(Error::InvalidConfiguration(
                "replication factor must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
