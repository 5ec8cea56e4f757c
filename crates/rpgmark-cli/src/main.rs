use std::error::Error;
use std::fs;
use std::path::Path;

use clap::{Parser, Subcommand};
use rpgmark_graph::{graph_from_bytes, graph_from_json, graph_to_bytes, graph_to_json, Digraph};
use tracing_subscriber::EnvFilter;

use commands::{
    damage::{self, DamageArgs},
    dot::{self, DotArgs},
    encode::{self, EncodeArgs},
    recover::{self, RecoverArgs},
    version::{self, VersionArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "rpgmark", about = "Reducible permutation graph watermark tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Encode a watermark value into its canonical graph.
    Encode(EncodeArgs),
    /// Recover watermarks from an observed graph.
    Recover(RecoverArgs),
    /// Delete or reorder edges of a canonical graph.
    Damage(DamageArgs),
    /// Render a graph in Graphviz DOT.
    Dot(DotArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Encode(args) => encode::run(&args),
        Command::Recover(args) => recover::run(&args),
        Command::Damage(args) => damage::run(&args),
        Command::Dot(args) => dot::run(&args),
        Command::Version(args) => version::run(&args),
    }
}

/// Graphs ending in `.bin` are bincode payloads; everything else is JSON.
fn load_graph(path: &Path) -> Result<Digraph, Box<dyn Error>> {
    let graph = if is_binary(path) {
        graph_from_bytes(&fs::read(path)?)?
    } else {
        graph_from_json(&fs::read_to_string(path)?)?
    };
    Ok(graph)
}

fn write_graph(path: &Path, graph: &Digraph) -> Result<(), Box<dyn Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    if is_binary(path) {
        fs::write(path, graph_to_bytes(graph)?)?;
    } else {
        fs::write(path, graph_to_json(graph)?)?;
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn is_binary(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("bin")
}
