//! # forge_spec
//!
//! Normalization and rendering of SpecForge specification documents.
//!
//! A specification document is a hand-authored, loosely structured YAML (or
//! JSON) mapping describing a software component: header conventions, data
//! layouts, algorithms, error handling, section requirements, performance
//! targets, tests and style rules. This crate turns it into a fully typed
//! [`Specification`] and renders that as a deterministic plain-text report.
//!
//! ## Pipeline
//!
//! - **Reader**: text to [`RawDocument`] (parse failures end here)
//! - **Normalizer**: [`RawDocument`] to [`Specification`]; every optional field
//!   defaults, only `metadata.name`/`version`/`description` are required
//! - **Renderer**: [`Specification`] to report text, fixed section order
//!
//! [`SpecForge`] wires the three together behind an optional result cache.
//!
//! ## Example
//!
//! ```rust
//! use forge_spec::{OutputFormat, SpecForge};
//!
//! let forge = SpecForge::default();
//! let report = forge
//!     .forge_str(
//!         "metadata: {name: memcpy_impl, version: '1.0', description: fast copy}",
//!         OutputFormat::Text,
//!     )
//!     .unwrap();
//! assert!(report.starts_with("=== SPECIFICATION ===\nName: memcpy_impl"));
//! ```

pub mod cache;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod forge;
pub mod models;
pub mod normalizer;
pub mod raw;
pub mod reader;
pub mod renderer;
pub mod validator;

pub use cache::{CacheStats, ForgeCache};
pub use config::ForgeConfig;
pub use diagnostics::{CollectedDiagnostics, Diagnostic, DiagnosticKind, Diagnostics, TracingDiagnostics};
pub use error::{ForgeError, ForgeResult};
pub use forge::{OutputFormat, SpecForge};
pub use models::*;
pub use normalizer::Normalizer;
pub use raw::{RawDocument, RawEntry, Record, RecordValue};
pub use reader::{DocumentFormat, SpecReader};
pub use renderer::TextRenderer;
pub use validator::{SpecValidator, ValidationResult};
