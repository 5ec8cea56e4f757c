use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rpgmark_core::rng::RngHandle;
use rpgmark_graph::{apply_all, apply_damage, sample_deletion, shuffle_labels, EdgeDamage};
use serde_json::json;
use tracing::info;

use crate::{load_graph, print_json, write_graph};

#[derive(Args, Debug)]
pub struct DamageArgs {
    /// Canonical graph to damage.
    #[arg(long)]
    pub graph: PathBuf,
    /// Delete the list edge leaving these labels.
    #[arg(long = "delete-list", value_name = "LABEL")]
    pub delete_list: Vec<u64>,
    /// Delete the tree edge leaving these labels.
    #[arg(long = "delete-tree", value_name = "LABEL")]
    pub delete_tree: Vec<u64>,
    /// Reverse the reference order of these labels.
    #[arg(long, value_name = "LABEL", num_args = 1..)]
    pub flip: Vec<u64>,
    /// Delete one more edge, drawn from this master seed.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Trial number under `--seed`; every trial draws an independent stream.
    #[arg(long, default_value_t = 0, requires = "seed")]
    pub trial: u64,
    /// Relabel the damaged graph at random, drawing from the same stream.
    #[arg(long, requires = "seed")]
    pub shuffle: bool,
    /// Where to write the damaged graph.
    #[arg(long)]
    pub out: PathBuf,
}

pub fn run(args: &DamageArgs) -> Result<(), Box<dyn Error>> {
    let mut graph = load_graph(&args.graph)?;
    let mut steps: Vec<EdgeDamage> = args
        .flip
        .iter()
        .copied()
        .map(EdgeDamage::Flip)
        .chain(args.delete_list.iter().copied().map(EdgeDamage::DeleteList))
        .chain(args.delete_tree.iter().copied().map(EdgeDamage::DeleteTree))
        .collect();
    apply_all(&mut graph, &steps)?;
    if let Some(seed) = args.seed {
        let mut rng = RngHandle::for_substream(seed, args.trial);
        if let Some(sampled) = sample_deletion(&graph, &mut rng) {
            apply_damage(&mut graph, sampled)?;
            steps.push(sampled);
        }
        if args.shuffle {
            graph = shuffle_labels(&graph, &mut rng)?.0;
        }
        info!(seed, trial = args.trial, shuffled = args.shuffle, "sampled damage applied");
    }
    write_graph(&args.out, &graph)?;
    info!(steps = steps.len(), edges = graph.edge_count(), "damaged graph written");
    print_json(&json!({
        "applied": steps,
        "shuffled": args.shuffle,
        "vertices": graph.vertex_count(),
        "edges": graph.edge_count(),
    }))
}
