//! The forge pipeline: raw document, normalize, render.

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};

use crate::cache::{fingerprint, ForgeCache};
use crate::config::ForgeConfig;
use crate::diagnostics::{Diagnostics, TracingDiagnostics};
use crate::error::{ForgeError, ForgeResult};
use crate::models::Specification;
use crate::normalizer::Normalizer;
use crate::raw::RawDocument;
use crate::reader::{DocumentFormat, SpecReader};
use crate::renderer::TextRenderer;

/// Report formats the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    #[serde(alias = "txt")]
    Text,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            other => Err(ForgeError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entry point for turning raw documents into reports.
///
/// Holds the only shared state of the pipeline: an optional report cache and
/// the diagnostics sink. Both are injected, so two instances never observe
/// each other.
pub struct SpecForge {
    config: ForgeConfig,
    cache: Option<Arc<ForgeCache>>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl Default for SpecForge {
    fn default() -> Self {
        Self::new(ForgeConfig::default())
    }
}

impl SpecForge {
    /// Create a forge from configuration, logging diagnostics through `tracing`.
    pub fn new(config: ForgeConfig) -> Self {
        let cache = config.cache_enabled.then(|| Arc::new(ForgeCache::new()));
        Self {
            config,
            cache,
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    /// Share an existing cache.
    pub fn with_cache(mut self, cache: Arc<ForgeCache>) -> Self {
        self.config.cache_enabled = true;
        self.cache = Some(cache);
        self
    }

    pub fn without_cache(mut self) -> Self {
        self.config.cache_enabled = false;
        self.cache = None;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn config(&self) -> &ForgeConfig {
        &self.config
    }

    pub fn cache(&self) -> Option<&Arc<ForgeCache>> {
        self.cache.as_ref()
    }

    /// Normalize a raw document without rendering it.
    pub fn specification(&self, raw: &RawDocument) -> ForgeResult<Specification> {
        Normalizer::new(self.diagnostics.as_ref()).normalize(raw)
    }

    /// Normalize and render a raw document.
    ///
    /// A cache hit returns the stored report without normalizing again, so
    /// coercion diagnostics are reported once, on the render that filled the
    /// cache. Use [`SpecForge::specification`] to re-run them on demand.
    pub fn forge(&self, raw: &RawDocument, format: OutputFormat) -> ForgeResult<String> {
        let _span = info_span!("forge", format = %format).entered();

        let key = match &self.cache {
            Some(cache) => {
                let key = fingerprint(raw, format, self.config.indent_width)?;
                if let Some(report) = cache.get(&key) {
                    info!("Serving cached report; diagnostics were reported on first render");
                    return Ok(report);
                }
                Some(key)
            }
            None => None,
        };

        let spec = self.specification(raw)?;
        info!("Forging report for '{}' v{}", spec.metadata.name, spec.metadata.version);

        let report = match format {
            OutputFormat::Text => TextRenderer::new()
                .with_indent(self.config.indent_width)
                .render(&spec),
        };
        debug!("Rendered {} lines", report.lines().count());

        if let (Some(cache), Some(key)) = (&self.cache, key) {
            cache.insert(key, report.clone());
        }
        Ok(report)
    }

    /// Parse YAML text and forge it.
    pub fn forge_str(&self, content: &str, format: OutputFormat) -> ForgeResult<String> {
        let raw = SpecReader::parse_str(content, DocumentFormat::Yaml)?;
        self.forge(&raw, format)
    }
}
