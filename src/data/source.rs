use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::models::{CoappearanceBase, RawEpisode};
use crate::CastError;

pub const EPISODES_FILE: &str = "episodes.json";
pub const BASE_FILE: &str = "coappearance_base.json";

/// Both source documents, as parsed.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub episodes: Vec<RawEpisode>,
    /// Absent when the layout document was never generated.
    pub base: Option<CoappearanceBase>,
}

// ---------------------------------------------------------------------------
// Data source trait
// ---------------------------------------------------------------------------

/// Where the episode and co-appearance base documents come from.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Episode records. Missing or unparsable is a load failure.
    async fn load_episodes(&self) -> Result<Vec<RawEpisode>, CastError>;

    /// Layout document. `Ok(None)` when it does not exist.
    async fn load_base(&self) -> Result<Option<CoappearanceBase>, CastError>;
}

/// Reads `episodes.json` and `coappearance_base.json` from a directory.
pub struct FileDatasetSource {
    dir: PathBuf,
}

impl FileDatasetSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DatasetSource for FileDatasetSource {
    async fn load_episodes(&self) -> Result<Vec<RawEpisode>, CastError> {
        let path = self.dir.join(EPISODES_FILE);
        let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
            CastError::load(EPISODES_FILE, format!("{} ({})", e, path.display()))
        })?;
        parse_episodes(&text)
    }

    async fn load_base(&self) -> Result<Option<CoappearanceBase>, CastError> {
        let path = self.dir.join(BASE_FILE);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    "{} not found; continuing without layout or communities",
                    path.display()
                );
                return Ok(None);
            }
            Err(e) => return Err(CastError::load(BASE_FILE, e)),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| CastError::load(BASE_FILE, e))
    }
}

/// Parse the episode document. The top level must be an array; elements
/// that are not records are skipped.
pub fn parse_episodes(text: &str) -> Result<Vec<RawEpisode>, CastError> {
    let values: Vec<serde_json::Value> =
        serde_json::from_str(text).map_err(|e| CastError::load(EPISODES_FILE, e))?;
    let total = values.len();
    let episodes: Vec<RawEpisode> = values
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<RawEpisode>(v) {
            Ok(ep) => Some(ep),
            Err(e) => {
                tracing::debug!("Skipping malformed episode record: {}", e);
                None
            }
        })
        .collect();
    if episodes.len() < total {
        tracing::warn!(
            "Skipped {} of {} episode records that could not be parsed",
            total - episodes.len(),
            total
        );
    }
    Ok(episodes)
}

/// Fetch both documents concurrently. Either failing fails the whole load.
pub async fn load_dataset(source: &dyn DatasetSource) -> Result<Dataset, CastError> {
    let (episodes, base) = tokio::try_join!(source.load_episodes(), source.load_base())?;
    tracing::info!(
        "Loaded {} episode records ({} co-appearance base)",
        episodes.len(),
        if base.is_some() { "with" } else { "without" }
    );
    Ok(Dataset { episodes, base })
}
