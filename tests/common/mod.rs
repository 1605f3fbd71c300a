pub mod builders;
pub mod harness;

// Re-export commonly used test utilities
pub use builders::EpisodeBuilder;
pub use harness::DatasetDir;
