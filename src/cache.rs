//! Time-bounded read cache keyed by query signature.
//!
//! One instance lives for the whole session. Every response the fetch
//! gateway pulls from the backend lands here; push events and filter
//! changes knock entries out again. Expired entries are not swept, they
//! are lazily superseded by the next successful fetch for the same key.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Canonical cache key: endpoint path + pagination + active filters, in a
/// stable order. Two logically identical requests produce the same
/// signature, and any change to any request input changes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuerySignature(String);

impl QuerySignature {
    pub fn new(s: impl Into<String>) -> Self {
        QuerySignature(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QuerySignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

struct CacheEntry {
    payload: Value,
    fetched_at: Instant,
}

/// TTL map from query signature to the last fetched payload.
///
/// Growth is unbounded; the working set is one entry per distinct page the
/// user has visited inside the TTL window, which stays small in practice.
pub struct CacheStore {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl CacheStore {
    pub fn new(ttl: Duration) -> Self {
        CacheStore {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached payload, or `None` when there is no entry or the
    /// entry has outlived the TTL. Expired entries stay in place until the
    /// next `put` for the same signature overwrites them.
    pub fn get(&self, sig: &QuerySignature) -> Option<Value> {
        self.get_at(sig, Instant::now())
    }

    fn get_at(&self, sig: &QuerySignature, now: Instant) -> Option<Value> {
        let entries = self.entries.lock().unwrap();
        let entry = entries.get(sig.as_str())?;
        if now.duration_since(entry.fetched_at) < self.ttl {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    pub fn put(&self, sig: &QuerySignature, payload: Value) {
        self.put_at(sig, payload, Instant::now());
    }

    fn put_at(&self, sig: &QuerySignature, payload: Value, now: Instant) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            sig.as_str().to_string(),
            CacheEntry {
                payload,
                fetched_at: now,
            },
        );
    }

    /// Drops the entry for one exact signature, if present.
    pub fn invalidate(&self, sig: &QuerySignature) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(sig.as_str());
    }

    /// Drops every entry whose signature starts with `prefix`. Used when a
    /// push event announces a change to a whole resource class ("some new
    /// block exists") rather than one exact query.
    pub fn invalidate_prefix(&self, prefix: &str) {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let dropped = before - entries.len();
        if dropped > 0 {
            log::debug!("[cache] invalidated {dropped} entries under {prefix}");
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
