pub mod analytics;
pub mod arcs;
pub mod community;
pub mod matrix;
pub mod network;
pub mod normalize;
pub mod prefix;

pub use analytics::{
    character_presence, community_appearances, crew_leaderboard, crew_metrics, episode_metrics,
    technique_running, CharacterPresence, CommunitySeries, CrewEpisodeMetrics, EpisodeMetrics,
    PresenceCategory, TechniqueRunning,
};
pub use arcs::{arc_meta, ArcMeta, ArcOrder};
pub use community::CommunityTable;
pub use matrix::{CoMatrix, MatrixBuilder, CHECKPOINT_INTERVAL};
pub use network::{fallback_position, NetworkService, NodeLayout};
pub use normalize::{normalize, NormalizedDataset};
pub use prefix::CoappearanceEngine;
