//! Common test utilities for mindmap integration tests.
//!
//! Provides `TestEnv` for isolated test environments that never read the
//! user's `~/.config/mindmap/config.kdl`.

#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
pub use tempfile::TempDir;

/// A three-node chain `a -> b -> c` with labels, subnodes and one curve.
pub const CHAIN_JSON: &str = r#"{
  "nodes": [
    {"id": "a", "x": -200, "y": 0, "width": 80, "height": 40,
     "html": "<p><a href=\"https://a.example\">Alpha</a></p>"},
    {"id": "b", "x": 0, "y": 0, "width": 60, "height": 20, "html": "<p>Beta</p>",
     "nodesWidth": 50, "nodesHeight": 30, "nodesHTML": "<ul><li>b1</li></ul>"},
    {"id": "c", "x": 200, "y": 50, "fx": 200, "fy": 50, "width": 40, "height": 20,
     "html": "<p>Gamma</p>"}
  ],
  "connections": [
    {"source": "a", "target": "b", "curve": {"x": 30, "y": -20}},
    {"source": "b", "target": "c"}
  ]
}"#;

/// A test environment with isolated config and working directories.
///
/// - `work_dir`: Current directory for commands, holds input documents
/// - `config_dir`: Stands in for the system config directory (via `XDG_CONFIG_HOME`)
pub struct TestEnv {
    pub work_dir: TempDir,
    pub config_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            work_dir: TempDir::new().unwrap(),
            config_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the mm binary with isolated config directory.
    pub fn mm(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_mm"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("XDG_CONFIG_HOME", self.config_dir.path());
        cmd.env("HOME", self.config_dir.path());
        cmd.env_remove("MINDMAP_CONFIG");
        cmd.env_remove("MINDMAP_LOG");
        cmd
    }

    /// Write a file into the working directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work_dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write the system config.kdl.
    pub fn write_system_config(&self, contents: &str) -> PathBuf {
        let dir = self.config_dir.path().join("mindmap");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.kdl");
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn path(&self) -> &std::path::Path {
        self.work_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
