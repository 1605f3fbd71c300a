//! Network filtering and projection.
//!
//! Turns the engine's matrix at a boundary into the node/edge view the
//! dashboard draws, applying the user's thresholds and hidden buckets.

use std::sync::Arc;

use crate::models::{GraphEdge, GraphNode, NetworkGraph, NetworkQuery, Partner};
use crate::services::community::CommunityTable;
use crate::services::prefix::CoappearanceEngine;
use crate::utils::math::{frac, node_size};

/// Precomputed 2D layout with a deterministic fallback.
#[derive(Debug, Clone, Default)]
pub struct NodeLayout {
    positions: Vec<Option<[f64; 2]>>,
}

impl NodeLayout {
    /// Use `positions` only when it covers exactly `character_count` ids.
    pub fn new(positions: Vec<Option<[f64; 2]>>, character_count: usize) -> Self {
        if !positions.is_empty() && positions.len() != character_count {
            tracing::warn!(
                "Position table has {} entries for {} characters; using fallback layout",
                positions.len(),
                character_count
            );
            return Self::fallback_only();
        }
        Self { positions }
    }

    pub fn fallback_only() -> Self {
        Self {
            positions: Vec::new(),
        }
    }

    pub fn has_positions(&self) -> bool {
        !self.positions.is_empty()
    }

    pub fn position(&self, id: usize) -> [f64; 2] {
        self.positions
            .get(id)
            .copied()
            .flatten()
            .unwrap_or_else(|| fallback_position(id))
    }
}

/// Pseudo-random position in `[-1, 1)²` derived from the id alone.
pub fn fallback_position(id: usize) -> [f64; 2] {
    let idx = id as f64;
    let seed = (idx * 12.9898).sin() * 43758.5453;
    let seed2 = ((idx + 1.0) * 78.233).sin() * 12345.6789;
    [frac(seed) * 2.0 - 1.0, frac(seed2) * 2.0 - 1.0]
}

/// Stateless query service over a built engine.
#[derive(Clone)]
pub struct NetworkService {
    engine: Arc<CoappearanceEngine>,
    communities: Arc<CommunityTable>,
    layout: Arc<NodeLayout>,
}

impl NetworkService {
    pub fn new(
        engine: Arc<CoappearanceEngine>,
        communities: Arc<CommunityTable>,
        layout: Arc<NodeLayout>,
    ) -> Self {
        Self {
            engine,
            communities,
            layout,
        }
    }

    pub fn engine(&self) -> &CoappearanceEngine {
        &self.engine
    }

    /// Filter and project the network for one query.
    ///
    /// Eligible nodes are the `top_n` characters by appearance count (ties
    /// in id order) that also meet `min_node_appearances` and are not in a
    /// hidden bucket. Edges join eligible nodes whose weight at the boundary
    /// is at least `min_edge_weight`, each unordered pair once with
    /// `a < b`. Never fails: degenerate settings give an empty graph.
    pub fn filter_graph(&self, query: &NetworkQuery) -> NetworkGraph {
        let prefix_index = self.engine.resolve_boundary(query.episode_boundary);
        let counts = self.engine.prefix_counts_at(prefix_index);

        let mut candidates: Vec<usize> = (0..self.engine.character_count()).collect();
        if let Some(top_n) = query.top_n {
            // Stable sort keeps id order among equal counts.
            candidates.sort_by(|a, b| counts[*b].cmp(&counts[*a]));
            candidates.truncate(top_n);
        }

        let visible: Vec<usize> = candidates
            .into_iter()
            .filter(|&id| counts[id] >= query.min_node_appearances)
            .filter(|&id| !query.hidden_buckets.contains(&self.communities.bucket_of(id)))
            .collect();

        if visible.is_empty() {
            tracing::debug!(prefix_index, "Network query left no visible nodes");
            return NetworkGraph {
                episode_boundary: query.episode_boundary,
                prefix_index,
                nodes: Vec::new(),
                edges: Vec::new(),
            };
        }

        let matrix = self.engine.matrix_as_of(prefix_index);
        let mut by_id = visible.clone();
        by_id.sort_unstable();

        let mut edges = Vec::new();
        for (i, &a) in by_id.iter().enumerate() {
            for &b in &by_id[i + 1..] {
                let weight = matrix.weight(a, b);
                if weight >= query.min_edge_weight {
                    edges.push(GraphEdge { a, b, weight });
                }
            }
        }

        let characters = self.engine.characters();
        let nodes: Vec<GraphNode> = visible
            .iter()
            .map(|&id| GraphNode {
                id,
                name: characters.name(id).unwrap_or_default().to_string(),
                position: self.layout.position(id),
                size: node_size(counts[id]),
                appearances: counts[id],
                bucket: self.communities.bucket_of(id),
                label: self.communities.node_label(id),
            })
            .collect();

        tracing::debug!(
            prefix_index,
            nodes = nodes.len(),
            edges = edges.len(),
            "Network query resolved"
        );

        NetworkGraph {
            episode_boundary: query.episode_boundary,
            prefix_index,
            nodes,
            edges,
        }
    }

    /// Strongest co-appearance partners of `character` up to an episode,
    /// by weight descending then id. Zero-weight pairs are omitted.
    pub fn partners(&self, character: usize, episode_boundary: i64, limit: usize) -> Vec<Partner> {
        let prefix_index = self.engine.resolve_boundary(episode_boundary);
        let matrix = self.engine.matrix_as_of(prefix_index);
        let Some(row) = matrix.row(character) else {
            return Vec::new();
        };

        let mut partners: Vec<(usize, u32)> = row
            .iter()
            .enumerate()
            .filter(|&(id, &w)| id != character && w > 0)
            .map(|(id, &w)| (id, w))
            .collect();
        partners.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        partners.truncate(limit);

        let characters = self.engine.characters();
        partners
            .into_iter()
            .map(|(id, weight)| Partner {
                id,
                name: characters.name(id).unwrap_or_default().to_string(),
                weight,
            })
            .collect()
    }
}
