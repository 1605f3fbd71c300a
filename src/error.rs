use thiserror::Error;

/// Custom error type for castgraph operations.
///
/// Only loading and CLI-facing lookups can fail. Queries over a built
/// engine are total and never produce a `CastError`.
#[derive(Debug, Error)]
pub enum CastError {
    /// A required source document is missing or unparsable.
    #[error("Failed to load {document}: {message}")]
    Load { document: String, message: String },

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested entity was not found.
    #[error("Not found: {entity_type} '{id}'")]
    NotFound { entity_type: String, id: String },

    /// Input validation failed.
    #[error("Validation error: {0}")]
    Validation(String),
}

impl CastError {
    pub fn load(document: impl Into<String>, message: impl std::fmt::Display) -> Self {
        CastError::Load {
            document: document.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for CastError {
    fn from(err: serde_json::Error) -> Self {
        CastError::load("document", format!("JSON parse error: {}", err))
    }
}

impl From<std::io::Error> for CastError {
    fn from(err: std::io::Error) -> Self {
        CastError::load("document", format!("I/O error: {}", err))
    }
}
