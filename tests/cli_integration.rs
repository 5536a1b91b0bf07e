// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the graphlens CLI commands

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

const TRIANGLES: &str = r#"{
    "nodes": [
        {"id": "A"}, {"id": "B"}, {"id": "C"},
        {"id": "D"}, {"id": "E"}, {"id": "F"}
    ],
    "edges": [
        {"id": "ab", "source": "A", "target": "B"},
        {"id": "bc", "source": "B", "target": "C"},
        {"id": "ac", "source": "A", "target": "C"},
        {"id": "de", "source": "D", "target": "E"},
        {"id": "ef", "source": "E", "target": "F"},
        {"id": "df", "source": {"id": "D"}, "target": {"id": "F"}},
        {"id": "cd", "source": "C", "target": "D"},
        {"id": "dangling", "source": "A", "target": "Z"}
    ]
}"#;

/// Write the fixture graph into a fresh directory
fn write_graph(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("graph.json");
    std::fs::write(&path, TRIANGLES).unwrap();
    path
}

/// graphlens with an isolated environment
fn graphlens(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("graphlens").unwrap();
    cmd.env("GRAPHLENS_CONFIG", dir.path().join("config.toml"))
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    std::fs::write(dir.path().join("config.toml"), "").unwrap();
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn test_communities_json() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir);

    let output = graphlens(&dir)
        .args(["--json", "communities"])
        .arg(&graph)
        .args(["--seed", "42"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["communities"].as_array().unwrap().len(), 2);
    assert_eq!(
        json["assignments"]["A"]["communityId"],
        json["assignments"]["C"]["communityId"]
    );
    assert_ne!(
        json["assignments"]["C"]["communityId"],
        json["assignments"]["D"]["communityId"]
    );
    assert!(json["modularity"].as_f64().unwrap() > 0.0);
    assert!(json.get("computeTime").is_some());
}

#[test]
fn test_communities_text() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir);

    graphlens(&dir)
        .arg("communities")
        .arg(&graph)
        .args(["--seed", "1", "--members"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 communities"))
        .stdout(predicate::str::contains("A, B, C"));
}

#[test]
fn test_path_json() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir);

    let output = graphlens(&dir)
        .args(["--json", "path"])
        .arg(&graph)
        .args(["A", "F", "--algorithm", "bidirectional"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["found"], true);
    assert_eq!(json["algorithm"], "bidirectional");
    assert_eq!(json["paths"][0]["length"], 3);
    assert_eq!(json["paths"][0]["nodeIds"][0], "A");
    assert_eq!(json["paths"][0]["nodeIds"][3], "F");
}

#[test]
fn test_path_text_and_direction() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir);

    graphlens(&dir)
        .arg("path")
        .arg(&graph)
        .args(["A", "D"])
        .assert()
        .success()
        .stdout(predicate::str::contains("A->D#0"))
        .stdout(predicate::str::contains("-[cd]-> D"));

    graphlens(&dir)
        .arg("path")
        .arg(&graph)
        .args(["D", "A", "--direction", "outgoing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no path"));
}

#[test]
fn test_path_missing_node_fails() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir);

    graphlens(&dir)
        .arg("path")
        .arg(&graph)
        .args(["A", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("target node not found: nowhere"));
}

#[test]
fn test_path_rejects_unknown_algorithm() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir);

    graphlens(&dir)
        .arg("path")
        .arg(&graph)
        .args(["A", "B", "--algorithm", "astar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown algorithm 'astar'"));
}

#[test]
fn test_stats_reads_stdin() {
    let dir = TempDir::new().unwrap();

    let output = graphlens(&dir)
        .args(["--json", "stats", "-"])
        .write_stdin(TRIANGLES)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["nodes"], 6);
    assert_eq!(json["edges"], 7);
    assert_eq!(json["droppedEdges"], 1);
    assert_eq!(json["components"], 1);
}

#[test]
fn test_config_file_and_env_layers() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    std::fs::write(&config, "[detection]\nresolution = 3.0\n\n[path]\nmax_length = 4\n").unwrap();

    graphlens(&dir)
        .env("GRAPHLENS_CONFIG", &config)
        .env("GRAPHLENS_PATH__TIMEOUT_MS", "250")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("resolution = 3.0"))
        .stdout(predicate::str::contains("max_length = 4"))
        .stdout(predicate::str::contains("timeout_ms = 250"));
}

#[test]
fn test_missing_input_file() {
    let dir = TempDir::new().unwrap();

    graphlens(&dir)
        .args(["stats", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load graph"));
}

#[test]
fn test_no_color_accepts_any_value() {
    let dir = TempDir::new().unwrap();
    let graph = write_graph(&dir);

    for value in ["1", "yes", "false"] {
        graphlens(&dir)
            .env("NO_COLOR", value)
            .arg("stats")
            .arg(&graph)
            .assert()
            .success()
            .stdout(predicate::str::contains("\u{1b}[").not());
    }
}

#[test]
fn test_completions() {
    let dir = TempDir::new().unwrap();

    graphlens(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("graphlens"));
}
