//! Process-wide cache of the latest known configuration.
//!
//! # Design Decisions
//! - Whole-map atomic swap via `ArcSwap`: readers get an immutable
//!   `Arc<ConfigSnapshot>` and never observe a half-applied write
//! - Reads are lock-free and never wait for a refresh cycle
//! - Single writer (the refresh path); concurrent writers would still be
//!   correct through `rcu`, just wasteful

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde_json::Value;

use crate::client::change::{ConfigDocument, ConfigEntry, Fingerprint};
use crate::observability::metrics;

/// Immutable view of the cache at one point in time.
///
/// A namespace maps to `None` when it was fetched but the server had no data
/// for it.
#[derive(Debug, Clone, Default)]
pub struct ConfigSnapshot {
    entries: HashMap<String, Option<ConfigEntry>>,
    revision: u64,
}

impl ConfigSnapshot {
    /// Document for `namespace`, if one has been fetched.
    pub fn get(&self, namespace: &str) -> Option<&ConfigDocument> {
        self.entry(namespace).map(ConfigEntry::document)
    }

    pub fn entry(&self, namespace: &str) -> Option<&ConfigEntry> {
        self.entries.get(namespace).and_then(Option::as_ref)
    }

    /// Convenience lookup of a single key inside a namespace.
    pub fn value(&self, namespace: &str, key: &str) -> Option<&Value> {
        self.get(namespace).and_then(|doc| doc.get(key))
    }

    pub fn fingerprint(&self, namespace: &str) -> Option<Fingerprint> {
        self.entry(namespace).map(ConfigEntry::fingerprint)
    }

    /// True if the namespace has an entry, absent or not.
    pub fn contains(&self, namespace: &str) -> bool {
        self.entries.contains_key(namespace)
    }

    /// True if the namespace was fetched and the server had no data for it.
    pub fn is_absent(&self, namespace: &str) -> bool {
        matches!(self.entries.get(namespace), Some(None))
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Empty means configuration is not yet available.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of writes committed before this snapshot was taken.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// `{namespace: document | null}`.
    pub fn to_json(&self) -> Value {
        let map = self
            .entries
            .iter()
            .map(|(ns, entry)| {
                let value = entry
                    .as_ref()
                    .map(|e| Value::Object(e.document().clone()))
                    .unwrap_or(Value::Null);
                (ns.clone(), value)
            })
            .collect();
        Value::Object(map)
    }
}

/// The cache itself. One per client.
#[derive(Default)]
pub struct ConfigCache {
    current: ArcSwap<ConfigSnapshot>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently committed snapshot. Never blocks.
    pub fn get(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }

    pub fn is_populated(&self) -> bool {
        !self.current.load().is_empty()
    }

    /// Replace the entry for `namespace`.
    pub fn apply_update(&self, namespace: &str, entry: ConfigEntry) {
        self.commit(namespace, Some(entry));
    }

    /// Record that the server has no data for `namespace`.
    ///
    /// Only takes effect for namespaces without an entry; a previously
    /// fetched document is kept.
    pub fn mark_absent(&self, namespace: &str) -> bool {
        if self.current.load().contains(namespace) {
            return false;
        }
        self.commit(namespace, None);
        true
    }

    fn commit(&self, namespace: &str, entry: Option<ConfigEntry>) {
        let previous = self.current.rcu(|current| {
            let mut next = ConfigSnapshot::clone(current);
            next.entries.insert(namespace.to_string(), entry.clone());
            next.revision += 1;
            next
        });
        let revision = previous.revision + 1;

        metrics::record_cache_update(namespace, revision);
        tracing::debug!(namespace = %namespace, revision, "Cache entry committed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(value: Value) -> ConfigEntry {
        match value {
            Value::Object(map) => ConfigEntry::new(map),
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_starts_empty() {
        let cache = ConfigCache::new();
        let snapshot = cache.get();
        assert!(snapshot.is_empty());
        assert!(!cache.is_populated());
        assert_eq!(snapshot.revision(), 0);
        assert_eq!(snapshot.to_json(), json!({}));
    }

    #[test]
    fn test_apply_update() {
        let cache = ConfigCache::new();
        cache.apply_update("application", entry(json!({"key": "v1"})));

        let snapshot = cache.get();
        assert!(cache.is_populated());
        assert_eq!(snapshot.value("application", "key"), Some(&json!("v1")));
        assert_eq!(snapshot.revision(), 1);
    }

    #[test]
    fn test_old_snapshot_is_unaffected_by_writes() {
        let cache = ConfigCache::new();
        cache.apply_update("application", entry(json!({"key": "v1"})));
        let before = cache.get();

        cache.apply_update("application", entry(json!({"key": "v2"})));
        cache.apply_update("db", entry(json!({"pool": 4})));

        assert_eq!(before.value("application", "key"), Some(&json!("v1")));
        assert!(!before.contains("db"));
        assert_eq!(cache.get().value("application", "key"), Some(&json!("v2")));
        assert_eq!(cache.get().revision(), 3);
    }

    #[test]
    fn test_mark_absent_does_not_clobber_document() {
        let cache = ConfigCache::new();
        assert!(cache.mark_absent("feature-flags"));
        assert!(cache.get().is_absent("feature-flags"));
        assert!(cache.get().get("feature-flags").is_none());

        cache.apply_update("application", entry(json!({"key": "v1"})));
        assert!(!cache.mark_absent("application"));
        assert!(!cache.mark_absent("feature-flags"));

        let snapshot = cache.get();
        assert_eq!(snapshot.value("application", "key"), Some(&json!("v1")));
        assert_eq!(snapshot.revision(), 2);
        assert_eq!(
            snapshot.to_json(),
            json!({"application": {"key": "v1"}, "feature-flags": null})
        );
    }
}
