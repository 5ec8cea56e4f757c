use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rpgmark_core::VertexId;
use rpgmark_graph::graph_to_dot;
use rpgmark_recover::{classify_and_repair, nodes_from_graph};
use tracing::warn;

use crate::load_graph;

#[derive(Args, Debug)]
pub struct DotArgs {
    /// Graph to render.
    #[arg(long)]
    pub graph: PathBuf,
}

pub fn run(args: &DotArgs) -> Result<(), Box<dyn Error>> {
    let graph = load_graph(&args.graph)?;
    let nodes = nodes_from_graph(&graph)?;
    let path: Option<Vec<VertexId>> = match classify_and_repair(&nodes) {
        Ok((path, _)) => Some(
            path.observed()
                .iter()
                .copied()
                .filter(|vertex| !vertex.is_dummy())
                .collect(),
        ),
        Err(err) => {
            warn!(code = %err.info().code, "no Hamilton path, edges drawn uniformly");
            None
        }
    };
    print!("{}", graph_to_dot(&graph, path.as_deref()));
    Ok(())
}
