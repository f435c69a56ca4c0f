//! Subcommands.

use std::fmt;

use anyhow::Context;
use clap::Subcommand;
use corelib::{HashRing, NodeId, Partitioner, CAPACITY};
use replication::{ReplicationStrategy, SimpleStrategy};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print every virtual node with its owner.
    Layout {
        /// Also print each physical node's share of the key space.
        #[arg(long)]
        ownership: bool,
    },
    /// Store keys and print where each one lands.
    Assign {
        /// Keys to place.
        #[arg(required = true)]
        keys: Vec<String>,
        /// Also print a preference list of this many distinct nodes.
        #[arg(long)]
        copies: Option<usize>,
    },
    /// Show which keys change owner when nodes leave.
    Churn {
        /// Node ids to remove, comma separated.
        #[arg(long, value_delimiter = ',', required = true)]
        remove: Vec<u32>,
        /// Keys to track.
        #[arg(required = true)]
        keys: Vec<String>,
    },
}

/// Text produced by a command, one entry per output line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub lines: Vec<String>,
}

impl CommandResult {
    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }
}

impl fmt::Display for CommandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl Command {
    pub fn execute<P: Partitioner>(&self, ring: &HashRing<P>) -> anyhow::Result<CommandResult> {
        match self {
            Command::Layout { ownership } => layout(ring, *ownership),
            Command::Assign { keys, copies } => assign(ring, keys, *copies),
            Command::Churn { remove, keys } => churn(ring, remove, keys),
        }
    }
}

fn layout<P: Partitioner>(ring: &HashRing<P>, ownership: bool) -> anyhow::Result<CommandResult> {
    let topology = ring.topology();
    let mut out = CommandResult::default();
    out.push(format!(
        "{} nodes, {} virtual nodes, {} replicas, {}",
        ring.node_count(),
        topology.len(),
        ring.replicas(),
        ring.partitioner_name()
    ));
    for vnode in topology.vnodes() {
        out.push(format!(
            "{}\t{}\treplica {}",
            vnode.position, vnode.node_id, vnode.replica
        ));
    }

    if ownership {
        for (node_id, owned) in topology.ownership() {
            out.push(format!("{node_id}\t{:.4}%", share(owned)));
        }
    }
    Ok(out)
}

fn assign<P: Partitioner>(
    ring: &HashRing<P>,
    keys: &[String],
    copies: Option<usize>,
) -> anyhow::Result<CommandResult> {
    let strategy = copies.map(SimpleStrategy::new).transpose()?;
    let topology = ring.topology();

    let mut out = CommandResult::default();
    for key in keys {
        let position = ring.add_object(key.clone().into_bytes());
        let vnode = ring
            .locate(position)
            .with_context(|| format!("assigning {key:?}"))?;
        let mut line = format!("{key}\t{position}\t{}\t{}", vnode.position, vnode.node_id);

        if let Some(strategy) = &strategy {
            let replicas = strategy.replicas_for_position(&topology, position)?;
            line.push('\t');
            line.push_str(&join(&replicas));
        }
        out.push(line);
    }
    Ok(out)
}

fn churn<P: Partitioner>(
    ring: &HashRing<P>,
    remove: &[u32],
    keys: &[String],
) -> anyhow::Result<CommandResult> {
    let positions: Vec<_> = keys.iter().map(|k| ring.position_of(k.as_bytes())).collect();
    let before = positions
        .iter()
        .map(|p| ring.assign_object_to_physical_node(*p))
        .collect::<Result<Vec<_>, _>>()
        .context("assigning keys before removal")?;

    for &id in remove {
        ring.remove_node(NodeId(id))
            .with_context(|| format!("removing node {id}"))?;
    }

    let mut out = CommandResult::default();
    let mut moved = 0usize;
    for ((key, position), old) in keys.iter().zip(&positions).zip(&before) {
        match ring.assign_object_to_physical_node(*position) {
            Ok(new) if new == *old => out.push(format!("{key}\t{old}")),
            Ok(new) => {
                moved += 1;
                out.push(format!("{key}\t{old} -> {new}"));
            }
            Err(corelib::Error::EmptyRing) => {
                moved += 1;
                out.push(format!("{key}\t{old} -> (none)"));
            }
            Err(err) => return Err(err.into()),
        }
    }
    out.push(format!("moved {moved}/{}", keys.len()));
    Ok(out)
}

fn share(owned: u64) -> f64 {
    owned as f64 * 100.0 / CAPACITY as f64
}

fn join(nodes: &[NodeId]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}
