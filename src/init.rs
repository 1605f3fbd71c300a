//! Session initialization shared by every CLI command.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::data::{load_dataset, Dataset, DatasetSource, FileDatasetSource};
use crate::models::Bucket;
use crate::services::{
    arc_meta, normalize, ArcOrder, CoappearanceEngine, CommunityTable, MatrixBuilder,
    NetworkService, NodeLayout, NormalizedDataset,
};

/// Everything built once per session. Read-only after construction.
pub struct AppContext {
    pub data_path: PathBuf,
    pub config: DashboardConfig,
    pub dataset: Arc<NormalizedDataset>,
    pub engine: Arc<CoappearanceEngine>,
    pub communities: Arc<CommunityTable>,
    pub layout: Arc<NodeLayout>,
    pub arc_order: ArcOrder,
}

impl AppContext {
    /// Initialize application context.
    ///
    /// Data path priority: explicit path > CASTGRAPH_DATA_PATH env > ./data (if exists) > ~/.castgraph
    pub async fn new(explicit_path: Option<PathBuf>) -> Result<Self> {
        let data_path = resolve_data_path(explicit_path);
        tracing::info!("Using data path: {}", data_path.display());

        let config = DashboardConfig::load(&data_path);
        let source = FileDatasetSource::new(&data_path);
        let mut ctx = Self::from_source(&source, config)
            .await
            .with_context(|| format!("loading dataset from {}", data_path.display()))?;
        ctx.data_path = data_path;
        Ok(ctx)
    }

    /// Build a session from any source. `data_path` is left empty.
    pub async fn from_source(source: &dyn DatasetSource, config: DashboardConfig) -> Result<Self> {
        let dataset = load_dataset(source).await?;
        Ok(Self::from_dataset(dataset, config))
    }

    pub fn from_dataset(dataset: Dataset, config: DashboardConfig) -> Self {
        let Dataset { episodes, base } = dataset;
        let normalized = normalize(
            &episodes,
            base.as_ref().and_then(|b| b.all_chars.as_deref()),
        );
        let character_count = normalized.characters.len();

        let (communities, layout) = match &base {
            Some(base) => (
                CommunityTable::new(
                    base.assignments(),
                    base.labels(),
                    base.centroids(),
                    config.small_community_threshold,
                ),
                NodeLayout::new(base.positions.clone(), character_count),
            ),
            None => (
                CommunityTable::new(
                    Vec::new(),
                    Default::default(),
                    Default::default(),
                    config.small_community_threshold,
                ),
                NodeLayout::fallback_only(),
            ),
        };

        let engine = CoappearanceEngine::build(
            &normalized,
            MatrixBuilder::new(config.checkpoint_interval),
        );
        let arc_order = ArcOrder::from_meta(&arc_meta(&normalized.episodes));

        Self {
            data_path: PathBuf::new(),
            config,
            dataset: Arc::new(normalized),
            engine: Arc::new(engine),
            communities: Arc::new(communities),
            layout: Arc::new(layout),
            arc_order,
        }
    }

    pub fn network(&self) -> NetworkService {
        NetworkService::new(
            self.engine.clone(),
            self.communities.clone(),
            self.layout.clone(),
        )
    }

    /// Buckets over the full character index.
    pub fn buckets(&self) -> Vec<Bucket> {
        self.communities.classify(self.engine.characters(), &self.arc_order)
    }
}

fn resolve_data_path(explicit_path: Option<PathBuf>) -> PathBuf {
    explicit_path
        .or_else(|| std::env::var("CASTGRAPH_DATA_PATH").ok().map(PathBuf::from))
        .or_else(|| {
            let local_path = Path::new("data");
            if local_path.is_dir() {
                Some(local_path.to_path_buf())
            } else {
                None
            }
        })
        .unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".castgraph"))
                .unwrap_or_else(|| PathBuf::from(".castgraph"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_data_path(Some(PathBuf::from("/tmp/explicit")));
        assert_eq!(path, PathBuf::from("/tmp/explicit"));
    }
}
