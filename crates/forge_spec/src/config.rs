//! Pipeline configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ForgeError, ForgeResult};
use crate::forge::OutputFormat;
use crate::renderer::DEFAULT_INDENT;

/// Settings for a [`SpecForge`](crate::SpecForge) instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Report format
    pub format: OutputFormat,
    /// Whether identical documents are rendered once per instance
    pub cache_enabled: bool,
    /// Spaces per nesting level in the report
    pub indent_width: usize,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            cache_enabled: true,
            indent_width: DEFAULT_INDENT,
        }
    }
}

impl ForgeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file. Missing keys keep their defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ForgeResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ForgeError::NotFound(path.to_path_buf()));
        }
        debug!("Loading forge config from {:?}", path);
        Self::from_toml_str(&fs::read_to_string(path)?)
    }

    pub fn from_toml_str(content: &str) -> ForgeResult<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn cache(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }
}
