//! Specification validation utilities.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde_yaml::Value;

use crate::diagnostics::Diagnostic;
use crate::models::Specification;
use crate::normalizer::REQUIRED_METADATA;
use crate::raw::{plain, scalar_text, RawDocument};

/// Top-level keys the normalizer understands.
pub const KNOWN_SECTIONS: [&str; 10] = [
    "metadata",
    "header_format",
    "register_usage",
    "structures",
    "algorithms",
    "error_handling",
    "section_requirements",
    "performance",
    "testing",
    "code_style",
];

/// Validation result with details.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Normalization diagnostics become warnings.
    pub fn add_diagnostics(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        for diagnostic in diagnostics {
            self.add_warning(diagnostic.to_string());
        }
    }
}

fn version_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^v?\d+(\.\d+){0,2}([-+][0-9A-Za-z.-]+)?$").ok())
        .as_ref()
}

/// Validator for specification documents.
pub struct SpecValidator;

impl SpecValidator {
    /// Check the raw document before normalization.
    ///
    /// Unlike normalization, which stops at the first missing identity field,
    /// this reports all of them.
    pub fn validate_document(doc: &RawDocument) -> ValidationResult {
        let mut result = ValidationResult::new();
        let metadata = doc.section("metadata");

        for key in REQUIRED_METADATA {
            let value = metadata.and_then(|meta| meta.get(key)).map(plain);
            match value.and_then(scalar_text) {
                None => result.add_error(format!("Missing required field: metadata.{}", key)),
                Some(text) if text.trim().is_empty() => {
                    result.add_warning(format!("metadata.{} is empty", key))
                }
                Some(text)
                    if key == "version"
                        && version_pattern().is_some_and(|re| !re.is_match(text.trim())) =>
                {
                    result.add_warning(format!(
                        "metadata.version '{}' is not a dotted numeric version",
                        text
                    ))
                }
                Some(_) => {}
            }
        }

        for key in doc.keys() {
            if !KNOWN_SECTIONS.contains(&key.as_str()) {
                result.add_warning(format!("Unknown top-level section '{}' is ignored", key));
            }
        }

        if matches!(doc.get("metadata").map(plain), Some(v) if !matches!(v, Value::Mapping(_))) {
            result.add_error("metadata must be a mapping");
        }

        result
    }

    /// Check a normalized specification for sections that look unfinished.
    pub fn validate_specification(spec: &Specification) -> ValidationResult {
        let mut result = ValidationResult::new();

        for (name, structure) in &spec.structures {
            if structure.fields.is_empty() {
                result.add_warning(format!("Structure '{}' has no fields", name));
            }
        }

        for (name, algorithm) in &spec.algorithms {
            if algorithm.steps.is_empty() {
                result.add_warning(format!("Algorithm '{}' has no steps", name));
            }
        }

        let mut seen = HashSet::new();
        for reg in &spec.register_usage.general_purpose {
            if !seen.insert(reg.name.as_str()) {
                result.add_warning(format!("Register '{}' is listed more than once", reg.name));
            }
        }

        for test in &spec.testing.unit_tests {
            if test.is_placeholder() {
                result.add_warning(format!(
                    "Unit test '{}' still has placeholder input or expected output",
                    test.name
                ));
            }
        }

        result
    }
}
