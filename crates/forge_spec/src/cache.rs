//! In-memory report cache keyed by document fingerprint.
//!
//! Pure memoization: a hit returns exactly what the pipeline would have
//! produced, and a poisoned lock degrades to a miss.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::{ForgeError, ForgeResult};
use crate::forge::OutputFormat;
use crate::raw::RawDocument;

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// A cached report.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub report: String,
    pub stored_at: DateTime<Utc>,
}

/// Thread-safe report cache, one lock per instance.
#[derive(Debug, Default)]
pub struct ForgeCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl ForgeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a report by fingerprint.
    pub fn get(&self, key: &str) -> Option<String> {
        let found = self
            .lock()
            .and_then(|entries| entries.get(key).map(|entry| entry.report.clone()));

        match found {
            Some(report) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for {}", short(key));
                Some(report)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a report under a fingerprint, replacing any previous one.
    pub fn insert(&self, key: impl Into<String>, report: impl Into<String>) {
        let key = key.into();
        if let Some(mut entries) = self.lock() {
            debug!("Caching report for {}", short(&key));
            entries.insert(
                key,
                CacheEntry {
                    report: report.into(),
                    stored_at: Utc::now(),
                },
            );
        }
    }

    /// When the report for `key` was stored, if it is cached.
    pub fn stored_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.lock()
            .and_then(|entries| entries.get(key).map(|entry| entry.stored_at))
    }

    pub fn clear(&self) {
        if let Some(mut entries) = self.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn statistics(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    fn lock(&self) -> Option<MutexGuard<'_, HashMap<String, CacheEntry>>> {
        match self.entries.lock() {
            Ok(guard) => Some(guard),
            Err(_) => {
                warn!("Report cache lock poisoned, bypassing cache");
                None
            }
        }
    }
}

/// SHA-256 over the canonical YAML form of the document plus the rendering
/// options that shape the report.
pub fn fingerprint(
    doc: &RawDocument,
    format: OutputFormat,
    indent_width: usize,
) -> ForgeResult<String> {
    let canonical = serde_yaml::to_string(doc.root())
        .map_err(|e| ForgeError::processing("fingerprint", e))?;

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hasher.update([0u8]);
    hasher.update(format.as_str().as_bytes());
    hasher.update(indent_width.to_le_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn short(key: &str) -> &str {
    &key[..key.len().min(12)]
}
