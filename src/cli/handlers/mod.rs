//! CLI command handlers.

pub mod analytics;
pub mod community;
pub mod network;
