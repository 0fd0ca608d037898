//! Error types for Nebula

use crate::NodeId;
use thiserror::Error;

/// The main error type for Nebula operations
#[derive(Debug, Error)]
pub enum NebulaError {
    #[error("Invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Render error: {0}")]
    Render(String),
}

impl NebulaError {
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        NebulaError::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for Nebula operations
pub type Result<T> = std::result::Result<T, NebulaError>;

impl From<toml::de::Error> for NebulaError {
    fn from(err: toml::de::Error) -> Self {
        NebulaError::TomlParse(err.to_string())
    }
}
