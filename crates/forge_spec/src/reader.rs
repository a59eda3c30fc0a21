//! Raw document loading.

use std::fs;
use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::error::{ForgeError, ForgeResult};
use crate::raw::RawDocument;

/// Serialization a raw document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    #[default]
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Pick the format from a file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Reader for raw specification documents.
pub struct SpecReader;

impl SpecReader {
    /// Parse document text into a raw document.
    pub fn parse_str(content: &str, format: DocumentFormat) -> ForgeResult<RawDocument> {
        let value = match format {
            DocumentFormat::Yaml => {
                let mut value: Value = serde_yaml::from_str(content)?;
                value.apply_merge()?;
                value
            }
            DocumentFormat::Json => serde_json::from_str(content)?,
        };
        RawDocument::from_value(value)
    }

    /// Read and parse a document from disk.
    pub fn read_path(path: impl AsRef<Path>) -> ForgeResult<RawDocument> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ForgeError::NotFound(path.to_path_buf()));
        }
        debug!("Reading specification from {:?}", path);

        let content = fs::read_to_string(path)?;
        Self::parse_str(&content, DocumentFormat::from_path(path))
    }
}
