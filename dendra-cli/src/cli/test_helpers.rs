//! Small helpers shared across CLI tests.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use tempfile::TempDir;

use super::{Cli, CliError, run_cli};

/// Four points: three near the origin and an outlier, with a merge tree and
/// step log joining them at heights 1, 2 and 20.
pub(super) const SCENARIO_SESSION: &str = r#"{
    "points": [
        { "id": "P0", "x": 0.0, "y": 0.0, "attributes": { "age": 30 } },
        { "id": "P1", "x": 1.0, "y": 0.0, "attributes": { "age": 40 } },
        { "id": "P2", "x": 0.0, "y": 1.0, "attributes": { "age": 50 } },
        { "id": "P3", "x": 10.0, "y": 10.0, "attributes": { "age": "unknown" } }
    ],
    "response": {
        "dendrogram": {
            "height": 20.0,
            "left": {
                "height": 2.0,
                "left": {
                    "height": 1.0,
                    "left": { "label": "P0", "indices": [0] },
                    "right": { "label": "P1", "indices": [1] }
                },
                "right": { "label": "P2", "indices": [2] }
            },
            "right": { "label": "P3", "indices": [3] }
        },
        "steps": [
            { "cluster1": [0], "cluster2": [1], "mergedCluster": [0, 1], "distance": 1.0, "action": "connect" },
            { "cluster1": [0, 1], "cluster2": [2], "mergedCluster": [0, 1, 2], "distance": 2.0, "action": "connect" },
            { "cluster1": [0, 1, 2], "cluster2": [3], "mergedCluster": [0, 1, 2, 3], "distance": 20.0, "action": "connect" },
            { "cluster1": [], "cluster2": [], "mergedCluster": [0, 1, 2, 3], "distance": 20.0, "action": "complete" }
        ],
        "finalClusters": [[0, 1, 2, 3]]
    }
}"#;

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

pub(super) fn create_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(contents.as_bytes())?;
    Ok(path)
}

pub(super) fn run_cli_expecting_error(cli: Cli, panic_msg: &str) -> CliError {
    match run_cli(cli) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
