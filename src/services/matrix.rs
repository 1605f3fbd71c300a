//! Co-appearance matrix construction with periodic checkpoints.
//!
//! The matrix is built once by folding episodes in sorted order. Every
//! `interval` episodes, and after the final episode, a deep copy of the
//! running matrix is stored so that prefix queries replay at most
//! `interval - 1` episodes.

use ndarray::Array2;

use crate::models::Episode;

/// Default number of episodes between checkpoints.
pub const CHECKPOINT_INTERVAL: usize = 50;

/// Symmetric character-by-character co-occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoMatrix {
    counts: Array2<u32>,
}

impl CoMatrix {
    pub fn zeros(size: usize) -> Self {
        Self {
            counts: Array2::zeros((size, size)),
        }
    }

    pub fn size(&self) -> usize {
        self.counts.nrows()
    }

    /// Weight between two characters. Out-of-range ids read as 0.
    pub fn weight(&self, a: usize, b: usize) -> u32 {
        self.counts.get((a, b)).copied().unwrap_or(0)
    }

    pub fn row(&self, id: usize) -> Option<ndarray::ArrayView1<'_, u32>> {
        (id < self.size()).then(|| self.counts.row(id))
    }

    pub fn as_array(&self) -> &Array2<u32> {
        &self.counts
    }

    /// Fold one episode: every pair of positions `i < j` in the list adds 1
    /// to both `[a][b]` and `[b][a]`.
    ///
    /// The list is used as given. A character listed twice in one episode
    /// pairs with each co-star twice, and a pair of equal ids is skipped so
    /// the diagonal stays zero.
    pub fn fold_episode(&mut self, character_ids: &[usize]) {
        for (i, &a) in character_ids.iter().enumerate() {
            for &b in &character_ids[i + 1..] {
                if a == b {
                    continue;
                }
                self.counts[(a, b)] += 1;
                self.counts[(b, a)] += 1;
            }
        }
    }
}

/// Immutable matrix snapshot covering episodes `[0, boundary)`.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    boundary: usize,
    matrix: CoMatrix,
}

impl Checkpoint {
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    pub fn matrix(&self) -> &CoMatrix {
        &self.matrix
    }
}

/// Output of a matrix build.
#[derive(Debug, Clone)]
pub struct MatrixBuild {
    /// Ordered by boundary, strictly increasing.
    pub checkpoints: Vec<Checkpoint>,
    /// Per-episode id lists in sorted episode order.
    pub episode_character_ids: Vec<Vec<usize>>,
}

impl MatrixBuild {
    pub fn checkpoint_boundaries(&self) -> Vec<usize> {
        self.checkpoints.iter().map(|c| c.boundary).collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MatrixBuilder {
    interval: usize,
}

impl Default for MatrixBuilder {
    fn default() -> Self {
        Self::new(CHECKPOINT_INTERVAL)
    }
}

impl MatrixBuilder {
    /// An interval of 0 is treated as 1 (a checkpoint per episode).
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn build(&self, episodes: &[Episode], character_count: usize) -> MatrixBuild {
        let episode_character_ids: Vec<Vec<usize>> = episodes
            .iter()
            .map(|ep| {
                ep.character_ids
                    .iter()
                    .copied()
                    .filter(|&id| id < character_count)
                    .collect()
            })
            .collect();

        let total = episode_character_ids.len();
        let mut matrix = CoMatrix::zeros(character_count);
        let mut checkpoints = Vec::with_capacity(total / self.interval + 1);

        for (idx, ids) in episode_character_ids.iter().enumerate() {
            matrix.fold_episode(ids);
            let boundary = idx + 1;
            if boundary % self.interval == 0 || boundary == total {
                checkpoints.push(Checkpoint {
                    boundary,
                    matrix: matrix.clone(),
                });
            }
        }

        tracing::debug!(
            episodes = total,
            characters = character_count,
            checkpoints = checkpoints.len(),
            "Built co-appearance matrix"
        );

        MatrixBuild {
            checkpoints,
            episode_character_ids,
        }
    }
}
