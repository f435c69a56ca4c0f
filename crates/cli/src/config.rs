//! Command-line configuration.
//!
//! Ring parameters come from an optional JSON file and are overridden by
//! flags. The ring itself lives only for the duration of one command.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use corelib::partitioner::{Crc32Partitioner, SipPartitioner, Xxh3Partitioner};
use corelib::{HashRing, NodeId, Partitioner, Position, RingConfig};
use tracing::debug;

use crate::commands::Command;

/// Hash function used to place keys on the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PartitionerKind {
    /// CRC32, IEEE polynomial.
    Crc32,
    /// XXH3-64, low 32 bits.
    #[default]
    Xxh3,
    /// SipHash-1-3 with a zero key, low 32 bits.
    Sip,
}

impl Partitioner for PartitionerKind {
    fn partition(&self, key: &[u8]) -> Position {
        match self {
            PartitionerKind::Crc32 => Crc32Partitioner.partition(key),
            PartitionerKind::Xxh3 => Xxh3Partitioner.partition(key),
            PartitionerKind::Sip => SipPartitioner::default().partition(key),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            PartitionerKind::Crc32 => Crc32Partitioner.name(),
            PartitionerKind::Xxh3 => Xxh3Partitioner.name(),
            PartitionerKind::Sip => SipPartitioner::default().name(),
        }
    }
}

/// Inspect a consistent hash ring.
#[derive(Debug, Parser)]
#[command(name = "ringctl", version, about)]
pub struct CliConfig {
    /// JSON file with `replicas` and `nodes`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Virtual nodes per physical node.
    #[arg(long, short = 'r', global = true)]
    pub replicas: Option<u32>,

    /// Physical node ids, comma separated. Replaces the file's node list.
    #[arg(long, short = 'n', value_delimiter = ',', global = true)]
    pub nodes: Vec<u32>,

    /// Hash function for keys.
    #[arg(long, value_enum, default_value_t = PartitionerKind::default(), global = true)]
    pub partitioner: PartitionerKind,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Merges the config file (if any) with command-line overrides.
    pub fn ring_config(&self) -> anyhow::Result<RingConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => RingConfig::default(),
        };

        if let Some(replicas) = self.replicas {
            config.replicas = replicas;
        }
        if !self.nodes.is_empty() {
            config.nodes = self.nodes.iter().copied().map(NodeId).collect();
        }
        config.validate()?;
        Ok(config)
    }

    /// Builds the ring described by this configuration.
    pub fn build_ring(&self) -> anyhow::Result<HashRing<PartitionerKind>> {
        let config = self.ring_config()?;
        let ring = HashRing::from_config(self.partitioner, &config)?;
        debug!(?ring, "ring ready");
        Ok(ring)
    }

    pub fn run(self) -> anyhow::Result<()> {
        setup_tracing(&self.log_level);
        let ring = self.build_ring()?;
        let result = self.command.execute(&ring)?;
        print!("{result}");
        Ok(())
    }
}

/// Initialize the `tracing` subscriber with the given level filter.
///
/// Respects `RUST_LOG` env var if set, otherwise uses the flag value.
fn setup_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("ringctl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_without_file() {
        let cli = parse(&["--replicas", "4", "--nodes", "0,1,4294967295", "layout"]);
        let config = cli.ring_config().unwrap();
        assert_eq!(config.replicas, 4);
        assert_eq!(config.nodes, vec![NodeId(0), NodeId(1), NodeId(u32::MAX)]);
        assert_eq!(cli.partitioner, PartitionerKind::Xxh3);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["layout", "-r", "2", "-n", "7", "--partitioner", "crc32"]);
        let ring = cli.build_ring().unwrap();
        assert_eq!(ring.vnode_count(), 2);
        assert_eq!(ring.partitioner_name(), "Crc32Partitioner");
    }

    #[test]
    fn test_file_then_overrides() {
        let path = std::env::temp_dir().join(format!("ringctl-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "replicas": 3, "nodes": [5, 6] }"#).unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let from_file = parse(&["--config", path_arg.as_str(), "layout"]).ring_config().unwrap();
        assert_eq!(from_file.replicas, 3);
        assert_eq!(from_file.nodes, vec![NodeId(5), NodeId(6)]);

        let overridden = parse(&["--config", path_arg.as_str(), "-r", "9", "layout"])
            .ring_config()
            .unwrap();
        assert_eq!(overridden.replicas, 9);
        assert_eq!(overridden.nodes, vec![NodeId(5), NodeId(6)]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_zero_replicas_is_an_error() {
        let cli = parse(&["-r", "0", "-n", "1", "layout"]);
        assert!(cli.build_ring().is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let cli = parse(&["--config", "/nonexistent/ringctl.json", "layout"]);
        let err = cli.ring_config().unwrap_err();
        assert!(err.to_string().contains("reading"));
    }

    #[test]
    fn test_partitioner_kinds_match_library() {
        assert_eq!(
            PartitionerKind::Crc32.partition(b"k"),
            Crc32Partitioner.partition(b"k")
        );
        assert_eq!(PartitionerKind::Sip.name(), "SipPartitioner");
    }
}
