//! "As of episode N" queries over the checkpointed matrix.

use ndarray::{Array1, Array2, ArrayView1};

use crate::models::CharacterIndex;
use crate::services::matrix::{Checkpoint, CoMatrix, MatrixBuilder};
use crate::services::normalize::NormalizedDataset;

/// Read-only co-appearance engine, built once per dataset load.
///
/// Holds the checkpoint index, the per-episode id lists needed for replay
/// and a full prefix table of per-character appearance counts. Every query
/// returns freshly materialized data; nothing stored is ever mutated after
/// construction.
#[derive(Debug, Clone)]
pub struct CoappearanceEngine {
    characters: CharacterIndex,
    episode_numbers: Vec<i64>,
    episode_character_ids: Vec<Vec<usize>>,
    checkpoints: Vec<Checkpoint>,
    /// Row `k` holds counts over the first `k` episodes.
    prefix_counts: Array2<u32>,
}

impl CoappearanceEngine {
    pub fn build(dataset: &NormalizedDataset, builder: MatrixBuilder) -> Self {
        let character_count = dataset.characters.len();
        let build = builder.build(&dataset.episodes, character_count);
        let prefix_counts = build_prefix_counts(&build.episode_character_ids, character_count);

        tracing::info!(
            "Co-appearance engine ready: {} episodes, {} characters, {} checkpoints",
            build.episode_character_ids.len(),
            character_count,
            build.checkpoints.len()
        );

        Self {
            characters: dataset.characters.clone(),
            episode_numbers: dataset.episode_numbers(),
            episode_character_ids: build.episode_character_ids,
            checkpoints: build.checkpoints,
            prefix_counts,
        }
    }

    pub fn characters(&self) -> &CharacterIndex {
        &self.characters
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }

    pub fn episode_count(&self) -> usize {
        self.episode_numbers.len()
    }

    pub fn episode_numbers(&self) -> &[i64] {
        &self.episode_numbers
    }

    pub fn checkpoint_boundaries(&self) -> Vec<usize> {
        self.checkpoints.iter().map(Checkpoint::boundary).collect()
    }

    /// Prefix index for an inclusive episode-number cut-off: the number of
    /// sorted episodes whose number is `<= episode_number`.
    pub fn resolve_boundary(&self, episode_number: i64) -> usize {
        self.episode_numbers.partition_point(|&n| n <= episode_number)
    }

    fn clamp(&self, boundary: usize) -> usize {
        boundary.min(self.episode_count())
    }

    /// Matrix over episodes `[0, boundary)`, rebuilt from the nearest
    /// checkpoint at or below `boundary`. Boundaries past the end clamp to
    /// the final episode.
    pub fn matrix_as_of(&self, boundary: usize) -> CoMatrix {
        let boundary = self.clamp(boundary);
        if boundary == 0 {
            return CoMatrix::zeros(self.character_count());
        }

        let nearest = self.checkpoints.partition_point(|c| c.boundary() <= boundary);
        let (start, mut matrix) = match nearest.checked_sub(1).map(|i| &self.checkpoints[i]) {
            Some(checkpoint) => (checkpoint.boundary(), checkpoint.matrix().clone()),
            None => (0, CoMatrix::zeros(self.character_count())),
        };

        for ids in &self.episode_character_ids[start..boundary] {
            matrix.fold_episode(ids);
        }
        matrix
    }

    /// Number of episodes among the first `boundary` that list `character`.
    /// Unknown ids read as 0.
    pub fn prefix_count_of(&self, boundary: usize, character: usize) -> u32 {
        self.prefix_counts
            .get((self.clamp(boundary), character))
            .copied()
            .unwrap_or(0)
    }

    /// All characters' appearance counts at `boundary`.
    pub fn prefix_counts_at(&self, boundary: usize) -> ArrayView1<'_, u32> {
        self.prefix_counts.row(self.clamp(boundary))
    }
}

/// Cumulative appearance table. A character listed several times in one
/// episode still counts once for that episode.
fn build_prefix_counts(episode_ids: &[Vec<usize>], character_count: usize) -> Array2<u32> {
    let mut table = Array2::<u32>::zeros((episode_ids.len() + 1, character_count));
    let mut running = Array1::<u32>::zeros(character_count);
    let mut seen = vec![false; character_count];

    for (idx, ids) in episode_ids.iter().enumerate() {
        for &id in ids {
            if !seen[id] {
                seen[id] = true;
                running[id] += 1;
            }
        }
        for &id in ids {
            seen[id] = false;
        }
        table.row_mut(idx + 1).assign(&running);
    }
    table
}
