//! Dashboard defaults, optionally overridden by `castgraph.toml`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::services::community::SMALL_COMMUNITY_THRESHOLD;
use crate::services::matrix::CHECKPOINT_INTERVAL;
use crate::CastError;

pub const CONFIG_FILE: &str = "castgraph.toml";

/// Initial control state and tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub min_node_appearances: u32,
    pub min_edge_weight: u32,
    /// `None` disables the top-N cap.
    pub top_n: Option<usize>,
    pub checkpoint_interval: usize,
    pub small_community_threshold: usize,
    pub rolling_window: usize,
    pub technique_min_debuts: u32,
    pub presence_min_count: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            min_node_appearances: 5,
            min_edge_weight: 10,
            top_n: Some(300),
            checkpoint_interval: CHECKPOINT_INTERVAL,
            small_community_threshold: SMALL_COMMUNITY_THRESHOLD,
            rolling_window: 10,
            technique_min_debuts: 5,
            presence_min_count: 20,
        }
    }
}

impl DashboardConfig {
    /// Strict parse, for callers that want the error.
    pub fn from_toml(contents: &str) -> Result<Self, CastError> {
        toml::from_str(contents).map_err(|e| CastError::Config(e.to_string()))
    }

    /// Load `castgraph.toml` from the data path. A missing, unreadable or
    /// malformed file yields the defaults.
    pub fn load(data_path: &Path) -> Self {
        let config_path = data_path.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match Self::from_toml(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded dashboard config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to parse {}: {}. Using defaults.",
                        config_path.display(),
                        e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "Failed to read {}: {}. Using defaults.",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = DashboardConfig::from_toml("min_edge_weight = 3\ntop_n = 40\n").unwrap();
        assert_eq!(config.min_edge_weight, 3);
        assert_eq!(config.top_n, Some(40));
        assert_eq!(config.min_node_appearances, 5);
        assert_eq!(config.checkpoint_interval, 50);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "min_edge_weight = \"lots\"").unwrap();
        assert_eq!(DashboardConfig::load(dir.path()), DashboardConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(DashboardConfig::load(dir.path()), DashboardConfig::default());
    }

    #[test]
    fn test_strict_parse_reports_config_error() {
        let err = DashboardConfig::from_toml("top_n = [").unwrap_err();
        assert!(matches!(err, CastError::Config(_)));
    }
}
