use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::tempdir;

fn rpgmark(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_rpgmark"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn json_stdout(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn encode_prints_summary_and_writes_graph() {
    let dir = tempdir().unwrap();
    let graph = dir.path().join("w5.json");
    let summary = json_stdout(&rpgmark(&[
        "encode",
        "--value",
        "5",
        "--split",
        "4",
        "--out",
        path_str(&graph),
    ]));
    assert_eq!(summary["vertices"], 9);
    assert_eq!(summary["edges"], 15);
    assert_eq!(summary["sip"], serde_json::json!([3, 5, 6, 0, 4, 1, 2]));
    assert_eq!(summary["segments"].as_array().unwrap().len(), 4);
    assert!(graph.exists());
}

#[test]
fn damage_then_recover_round_trip() {
    let dir = tempdir().unwrap();
    let graph = dir.path().join("w23.bin");
    let damaged = dir.path().join("cut.json");
    json_stdout(&rpgmark(&["encode", "--value", "23", "--out", path_str(&graph)]));

    let applied = json_stdout(&rpgmark(&[
        "damage",
        "--graph",
        path_str(&graph),
        "--delete-tree",
        "4",
        "--flip",
        "2",
        "3",
        "--out",
        path_str(&damaged),
    ]));
    assert_eq!(applied["edges"], 22);

    let report = json_stdout(&rpgmark(&["recover", "--graph", path_str(&damaged)]));
    assert_eq!(report["outcomes"][0]["watermark"], 23);
    assert_eq!(report["outcomes"][0]["damage"], "MissingBackEdge");
}

#[test]
fn recover_honours_config_file() {
    let dir = tempdir().unwrap();
    let graph = dir.path().join("w9.json");
    let config = dir.path().join("recover.yaml");
    std::fs::write(&config, "strategy: cross-check\nparallel: true\nthreads: 2\n").unwrap();
    json_stdout(&rpgmark(&["encode", "--value", "9", "--out", path_str(&graph)]));
    let report = json_stdout(&rpgmark(&[
        "recover",
        "--graph",
        path_str(&graph),
        "--config",
        path_str(&config),
    ]));
    assert_eq!(report["outcomes"][0]["watermark"], 9);
}

#[test]
fn dot_marks_tree_edges() {
    let dir = tempdir().unwrap();
    let graph = dir.path().join("w5.json");
    json_stdout(&rpgmark(&["encode", "--value", "5", "--out", path_str(&graph)]));
    let output = rpgmark(&["dot", "--graph", path_str(&graph)]);
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.starts_with("digraph RPG {"));
    assert_eq!(text.matches("style=dashed").count(), 7);
}

#[test]
fn zero_watermark_fails() {
    let output = rpgmark(&["encode", "--value", "0"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("zero-watermark"));
}

#[test]
fn short_version_is_the_package_version() {
    let output = rpgmark(&["version"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        env!("CARGO_PKG_VERSION")
    );
}

#[test]
fn seeded_damage_is_reproducible_and_recoverable() {
    let dir = tempdir().unwrap();
    let graph = dir.path().join("w1000.json");
    json_stdout(&rpgmark(&["encode", "--value", "1000", "--out", path_str(&graph)]));

    let mut written = Vec::new();
    for name in ["first.json", "second.json"] {
        let damaged = dir.path().join(name);
        let applied = json_stdout(&rpgmark(&[
            "damage",
            "--graph",
            path_str(&graph),
            "--seed",
            "17",
            "--trial",
            "3",
            "--shuffle",
            "--out",
            path_str(&damaged),
        ]));
        assert_eq!(applied["applied"].as_array().unwrap().len(), 1);
        assert_eq!(applied["shuffled"], true);
        written.push(std::fs::read(&damaged).unwrap());
    }
    assert_eq!(written[0], written[1]);

    let damaged = dir.path().join("first.json");
    let report = json_stdout(&rpgmark(&["recover", "--graph", path_str(&damaged)]));
    assert_eq!(report["outcomes"][0]["watermark"], 1000);
}
