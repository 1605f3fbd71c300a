use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::community::BucketId;

/// Filter settings for one network query.
///
/// Built fresh from the current control values on every change; the engine
/// keeps no query state of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkQuery {
    /// Inclusive episode number cut-off.
    pub episode_boundary: i64,
    pub min_node_appearances: u32,
    pub min_edge_weight: u32,
    /// Cap on eligible characters by appearance count, applied before
    /// `min_node_appearances`.
    pub top_n: Option<usize>,
    #[serde(default)]
    pub hidden_buckets: BTreeSet<BucketId>,
}

impl NetworkQuery {
    /// Query with every threshold disabled.
    pub fn unfiltered(episode_boundary: i64) -> Self {
        Self {
            episode_boundary,
            min_node_appearances: 0,
            min_edge_weight: 0,
            top_n: None,
            hidden_buckets: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: usize,
    pub name: String,
    pub position: [f64; 2],
    /// Rendering hint, grows logarithmically with `appearances`.
    pub size: f64,
    pub appearances: u32,
    pub bucket: BucketId,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GraphEdge {
    pub a: usize,
    pub b: usize,
    pub weight: u32,
}

/// Filtered, projected co-appearance network at one boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkGraph {
    pub episode_boundary: i64,
    /// Number of sorted episodes folded into this view.
    pub prefix_index: usize,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl NetworkGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A co-appearance partner of a single character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Partner {
    pub id: usize,
    pub name: String,
    pub weight: u32,
}
