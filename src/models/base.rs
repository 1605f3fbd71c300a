use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnNull};
use std::collections::HashMap;

use crate::models::community::CommunityAssignment;

/// Precomputed co-appearance layout document (`coappearance_base.json`).
///
/// Produced offline by the layout/community-detection step. Every table is
/// optional; missing tables degrade the network view instead of failing it.
#[serde_as]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CoappearanceBase {
    /// Authoritative character list. Defines id assignment when present.
    #[serde(default)]
    pub all_chars: Option<Vec<String>>,
    /// 2D layout per character id. `null` entries have no layout.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub positions: Vec<Option<[f64; 2]>>,
    /// Raw community id per character id, parallel to `all_chars`.
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub community: Vec<serde_json::Value>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub community_labels: HashMap<String, String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub community_centroids: HashMap<String, [f64; 2]>,
}

impl CoappearanceBase {
    pub fn assignments(&self) -> Vec<CommunityAssignment> {
        self.community
            .iter()
            .map(CommunityAssignment::from_value)
            .collect()
    }

    /// Labels keyed by numeric community id. Keys that are not ids are dropped.
    pub fn labels(&self) -> HashMap<u32, String> {
        parse_keys(&self.community_labels)
    }

    pub fn centroids(&self) -> HashMap<u32, [f64; 2]> {
        parse_keys(&self.community_centroids)
    }
}

fn parse_keys<V: Clone>(table: &HashMap<String, V>) -> HashMap<u32, V> {
    table
        .iter()
        .filter_map(|(k, v)| k.trim().parse::<u32>().ok().map(|id| (id, v.clone())))
        .collect()
}
