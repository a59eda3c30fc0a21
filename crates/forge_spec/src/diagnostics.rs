//! Diagnostics emitted while normalizing a raw document.
//!
//! Normalization never fails on irregular input; it substitutes defaults and
//! reports what it did here instead. The sink is injected into the pipeline so
//! the core stays a pure function of its inputs.

use std::sync::Mutex;

use tracing::{debug, warn};

/// What the normalizer did with an irregular piece of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A value had a different shape and was converted.
    Coerced,
    /// An entry could not be used and was left out.
    Skipped,
}

/// A single normalization diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Dotted path of the section the diagnostic belongs to, e.g. `algorithms.encode.steps`.
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb = match self.kind {
            DiagnosticKind::Coerced => "coerced",
            DiagnosticKind::Skipped => "skipped",
        };
        write!(f, "{} ({}): {}", self.path, verb, self.message)
    }
}

/// Receiver for normalization diagnostics.
pub trait Diagnostics: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::Coerced => debug!(path = %diagnostic.path, "{}", diagnostic.message),
            DiagnosticKind::Skipped => warn!(path = %diagnostic.path, "{}", diagnostic.message),
        }
    }
}

/// Keeps every diagnostic in memory, in the order reported.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    items: Mutex<Vec<Diagnostic>>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics collected so far.
    pub fn items(&self) -> Vec<Diagnostic> {
        match self.items.lock() {
            Ok(items) => items.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn report(&self, diagnostic: Diagnostic) {
        match self.items.lock() {
            Ok(mut items) => items.push(diagnostic),
            Err(poisoned) => poisoned.into_inner().push(diagnostic),
        }
    }
}
