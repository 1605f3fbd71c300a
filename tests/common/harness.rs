//! Test harness for on-disk datasets.
//!
//! Each DatasetDir is an isolated temporary data path, removed on drop.

use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

use castgraph::config::CONFIG_FILE;
use castgraph::data::{BASE_FILE, EPISODES_FILE};
use castgraph::init::AppContext;

pub struct DatasetDir {
    pub temp_dir: TempDir,
}

impl DatasetDir {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory for dataset");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn write_episodes(&self, episodes: &[Value]) -> &Self {
        self.write_raw(EPISODES_FILE, &Value::Array(episodes.to_vec()).to_string())
    }

    pub fn write_base(&self, base: &Value) -> &Self {
        self.write_raw(BASE_FILE, &base.to_string())
    }

    pub fn write_config(&self, toml: &str) -> &Self {
        self.write_raw(CONFIG_FILE, toml)
    }

    pub fn write_raw(&self, file: &str, contents: &str) -> &Self {
        std::fs::write(self.path().join(file), contents).expect("Failed to write test document");
        self
    }

    /// Load a full session from this directory.
    pub async fn context(&self) -> anyhow::Result<AppContext> {
        AppContext::new(Some(self.path().to_path_buf())).await
    }
}
