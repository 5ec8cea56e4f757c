use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use rpgmark_recover::{nodes_from_graph, recover_snapshot, ObservationBuffer, RecoveryConfig};
use tracing::info;

use crate::{load_graph, print_json};

#[derive(Args, Debug)]
pub struct RecoverArgs {
    /// Observed graph (`.bin` for bincode, JSON otherwise).
    #[arg(long)]
    pub graph: PathBuf,
    /// YAML recovery configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub fn run(args: &RecoverArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => RecoveryConfig::from_yaml_str(&fs::read_to_string(path)?)?,
        None => RecoveryConfig::default(),
    };
    let graph = load_graph(&args.graph)?;
    let mut buffer = ObservationBuffer::new(config.buffer_capacity);
    buffer.extend(nodes_from_graph(&graph)?);
    let snapshot = buffer.finish();
    info!(
        nodes = snapshot.len(),
        strategy = ?config.strategy,
        "recovering observed graph"
    );
    let report = recover_snapshot(&snapshot, &config)?;
    print_json(&report)
}
