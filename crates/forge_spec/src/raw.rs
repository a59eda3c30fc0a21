//! Raw document access and value coercion.
//!
//! The raw document is hand-authored and only loosely shaped, so every helper
//! here is total: it either returns a value of the requested shape or the
//! empty default for it. Nothing in this module fails.

use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::{Mapping, Number, Value};

use crate::error::{ForgeError, ForgeResult};

/// Ordered, open-ended record (integration tests, conformance tests, examples).
pub type Record = IndexMap<String, RecordValue>;

/// A value inside an open-ended [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecordValue {
    Text(String),
    Number(Number),
    List(Vec<RecordValue>),
    Map(Record),
}

impl RecordValue {
    /// Convert a YAML value. Booleans become text, null becomes empty text.
    pub fn from_value(value: &Value) -> Self {
        match plain(value) {
            Value::Null => Self::Text(String::new()),
            Value::Bool(b) => Self::Text(b.to_string()),
            Value::Number(n) => Self::Number(n.clone()),
            Value::String(s) => Self::Text(s.clone()),
            Value::Sequence(items) => Self::List(items.iter().map(Self::from_value).collect()),
            Value::Mapping(map) => Self::Map(record(map)),
            Value::Tagged(_) => Self::Text(String::new()),
        }
    }

    /// The single-line form of a scalar, `None` for lists and maps.
    pub fn inline(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::List(_) | Self::Map(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Number(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Map(map) => map.is_empty(),
        }
    }
}

impl Default for RecordValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for RecordValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// A list entry that may be given either as a bare name or as a full mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEntry<'a> {
    Bare(String),
    Full(&'a Mapping),
}

impl<'a> RawEntry<'a> {
    /// Classify a list item. Anything other than a string or a mapping yields `None`.
    pub fn classify(value: &'a Value) -> Option<Self> {
        match plain(value) {
            Value::String(s) => Some(Self::Bare(s.clone())),
            Value::Mapping(map) => Some(Self::Full(map)),
            _ => None,
        }
    }
}

/// The top-level raw document: an ordered mapping from section keys to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDocument {
    root: Mapping,
}

impl RawDocument {
    /// Wrap a parsed value, failing if the root is not a mapping.
    pub fn from_value(value: Value) -> ForgeResult<Self> {
        match value {
            Value::Mapping(root) => Ok(Self { root }),
            Value::Tagged(tagged) => Self::from_value(tagged.value),
            other => Err(ForgeError::NotAMapping(kind(&other))),
        }
    }

    pub fn from_mapping(root: Mapping) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Look up a top-level section by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// A top-level section as a mapping; absent or wrongly-shaped sections are `None`.
    pub fn section(&self, key: &str) -> Option<&Mapping> {
        self.get(key).and_then(as_mapping)
    }

    /// Top-level keys in document order.
    pub fn keys(&self) -> Vec<String> {
        self.root.iter().filter_map(|(k, _)| scalar_text(k)).collect()
    }
}

/// Look through YAML tags (`!foo value`).
pub fn plain(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => plain(&tagged.value),
        other => other,
    }
}

/// Human-readable name of a value's kind, for diagnostics.
pub fn kind(value: &Value) -> &'static str {
    match plain(value) {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

pub fn as_mapping(value: &Value) -> Option<&Mapping> {
    match plain(value) {
        Value::Mapping(map) => Some(map),
        _ => None,
    }
}

/// Text of a scalar: strings as-is, numbers and booleans in their literal form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match plain(value) {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// String field with an empty default.
pub fn text(map: &Mapping, key: &str) -> String {
    map.get(key).and_then(scalar_text).unwrap_or_default()
}

/// String field that may be missing entirely.
pub fn opt_text(map: &Mapping, key: &str) -> Option<String> {
    map.get(key).and_then(scalar_text)
}

/// Convert a mapping into an open-ended record, preserving key order.
pub fn record(map: &Mapping) -> Record {
    map.iter()
        .filter_map(|(k, v)| Some((scalar_text(k)?, RecordValue::from_value(v))))
        .collect()
}
