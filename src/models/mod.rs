pub mod base;
pub mod character;
pub mod community;
pub mod episode;
pub mod graph;

pub use base::CoappearanceBase;
pub use character::CharacterIndex;
pub use community::{Bucket, BucketId, CommunityAssignment};
pub use episode::{CrewCredits, CrewRole, Episode, RawEpisode};
pub use graph::{GraphEdge, GraphNode, NetworkGraph, NetworkQuery, Partner};
