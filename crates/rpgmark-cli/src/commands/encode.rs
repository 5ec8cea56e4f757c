use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use rpgmark_codec::{encode, split_hamilton_path};
use rpgmark_graph::canonical_hash;
use serde::Serialize;
use tracing::info;

use crate::{print_json, write_graph};

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Watermark value to encode (must be non-zero).
    #[arg(long)]
    pub value: u64,
    /// Split the Hamilton path into this many construction segments.
    #[arg(long)]
    pub split: Option<usize>,
    /// Write the canonical graph here (`.bin` for bincode, JSON otherwise).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct EncodeSummary {
    value: u64,
    bit_length: usize,
    sip: Vec<usize>,
    vertices: usize,
    edges: usize,
    fingerprint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    segments: Option<Vec<Vec<u64>>>,
}

pub fn run(args: &EncodeArgs) -> Result<(), Box<dyn Error>> {
    let rpg = encode(args.value)?;
    let path = rpg.hamilton_path();
    let segments = match args.split {
        Some(k) => Some(
            split_hamilton_path(&path, k)?
                .into_iter()
                .map(|segment| segment.iter().map(|vertex| vertex.as_raw()).collect())
                .collect(),
        ),
        None => None,
    };
    let summary = EncodeSummary {
        value: rpg.value(),
        bit_length: rpg.bit_length(),
        sip: rpg.sip().to_vec(),
        vertices: rpg.graph().vertex_count(),
        edges: rpg.graph().edge_count(),
        fingerprint: canonical_hash(rpg.graph(), &path)?,
        segments,
    };
    if let Some(out) = &args.out {
        write_graph(out, rpg.graph())?;
        info!(path = %out.display(), vertices = summary.vertices, "graph written");
    }
    print_json(&summary)
}
