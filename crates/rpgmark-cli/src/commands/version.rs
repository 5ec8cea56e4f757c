use std::error::Error;
use std::process::Command;

use clap::Args;
use rpgmark_core::SchemaVersion;
use serde::Serialize;

use crate::print_json;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit extended metadata including git and toolchain information.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    git_commit: String,
    rustc: String,
    graph_schema: String,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    print_json(&VersionInfo {
        version: env!("CARGO_PKG_VERSION").into(),
        git_commit: probe("git", &["rev-parse", "HEAD"]).unwrap_or_else(|| "unknown".into()),
        rustc: probe("rustc", &["--version"]).unwrap_or_else(|| "rustc unavailable".into()),
        graph_schema: SchemaVersion::CURRENT.to_string(),
    })
}

fn probe(program: &str, args: &[&str]) -> Option<String> {
    let out = Command::new(program).args(args).output().ok()?;
    if !out.status.success() {
        return None;
    }
    Some(String::from_utf8_lossy(&out.stdout).trim().to_string())
}
