//! Change detection for fetched documents.
//!
//! A document is fingerprinted by hashing its canonical JSON serialization.
//! `serde_json::Map` is key-sorted (the `preserve_order` feature is not
//! enabled), so two documents with the same content always serialize to the
//! same bytes regardless of the key order the server used.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

/// Full contents of one namespace at a point in time.
pub type ConfigDocument = Map<String, Value>;

/// Content hash of a [`ConfigDocument`]. Equality check only, not security.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    pub fn of(document: &ConfigDocument) -> Self {
        let mut hasher = Sha256::new();
        // Serializing a string-keyed map cannot fail.
        if let Ok(bytes) = serde_json::to_vec(document) {
            hasher.update(&bytes);
        }
        Self(hasher.finalize().into())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", &self.to_hex()[..12])
    }
}

/// A cached document together with its fingerprint.
#[derive(Debug, Clone)]
pub struct ConfigEntry {
    document: Arc<ConfigDocument>,
    fingerprint: Fingerprint,
}

impl ConfigEntry {
    pub fn new(document: ConfigDocument) -> Self {
        let fingerprint = Fingerprint::of(&document);
        Self {
            document: Arc::new(document),
            fingerprint,
        }
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    /// Shared handle to the document; stays pointer-equal until a real change.
    pub fn shared(&self) -> &Arc<ConfigDocument> {
        &self.document
    }

    pub fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }
}

/// Decide whether `new` should replace what is cached for a namespace.
///
/// `old` is `None` both when the namespace was never fetched and when the
/// server had no data for it; either way the first real document wins.
pub fn should_replace(old: Option<&ConfigEntry>, new: &ConfigEntry) -> bool {
    match old {
        None => true,
        Some(old) => old.fingerprint != new.fingerprint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ConfigDocument {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_key_order_does_not_matter() {
        let a: ConfigDocument = serde_json::from_str(r#"{"a":1,"b":{"y":2,"x":[1,2]}}"#).unwrap();
        let b: ConfigDocument = serde_json::from_str(r#"{"b":{"x":[1,2],"y":2},"a":1}"#).unwrap();
        assert_eq!(Fingerprint::of(&a), Fingerprint::of(&b));
    }

    #[test]
    fn test_value_change_changes_fingerprint() {
        let v1 = Fingerprint::of(&doc(json!({"key": "v1"})));
        let v2 = Fingerprint::of(&doc(json!({"key": "v2"})));
        assert_ne!(v1, v2);
        assert_eq!(v1.to_hex().len(), 64);
    }

    #[test]
    fn test_first_population_always_replaces() {
        let entry = ConfigEntry::new(doc(json!({})));
        assert!(should_replace(None, &entry));
    }

    #[test]
    fn test_identical_content_is_not_replaced() {
        let old = ConfigEntry::new(doc(json!({"timeout": 5, "name": "orders"})));
        let new = ConfigEntry::new(doc(json!({"name": "orders", "timeout": 5})));
        assert!(!should_replace(Some(&old), &new));
    }

    #[test]
    fn test_changed_content_is_replaced() {
        let old = ConfigEntry::new(doc(json!({"timeout": 5})));
        let new = ConfigEntry::new(doc(json!({"timeout": 6})));
        assert!(should_replace(Some(&old), &new));
    }
}
