//! Error types for the forge pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for forge operations.
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Errors that can occur while loading, normalizing or rendering a specification.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Specification file not found: {0}")]
    NotFound(PathBuf),

    #[error("Specification document must be a mapping at the top level, found {0}")]
    NotAMapping(&'static str),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Internal step failure outside parsing and normalization. Only raised
    /// when the report cache cannot serialize a document to fingerprint it.
    #[error("Failed to process specification during {stage}: {message}")]
    Processing { stage: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ForgeError {
    /// The raw input could not be turned into a mapping at all.
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            Self::NotAMapping(_) | Self::Yaml(_) | Self::Json(_) | Self::Toml(_)
        )
    }

    /// A mandatory metadata field was absent.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }

    pub(crate) fn processing(stage: impl Into<String>, message: impl ToString) -> Self {
        Self::Processing {
            stage: stage.into(),
            message: message.to_string(),
        }
    }
}
