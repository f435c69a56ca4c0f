//! CLI tool for inspecting consistent hash rings.
//!
//! Provides commands for:
//! - Printing the virtual-node layout and per-node key-space share
//! - Assigning keys to nodes, with optional preference lists
//! - Measuring how many keys move when nodes leave

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::{CliConfig, PartitionerKind};
