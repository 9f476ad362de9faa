//! Record data structure.
//!
//! A [`Record`] is the unit of data the store manages: an opaque mapping of
//! string keys to JSON values, with three engine-managed flags serialized
//! inline so a durable round trip reproduces them exactly.
//!
//! The flags are owned by the engine; storage adapters never set them.
//!
//! # Example
//!
//! ```
//! use offline_store::Record;
//! use serde_json::json;
//!
//! let record = Record::from_value(json!({"id": 42, "title": "milk"})).unwrap();
//!
//! assert_eq!(record.identity("id").as_deref(), Some("42"));
//! assert!(!record.outdated);
//! assert!(!record.modified);
//! assert!(!record.removed);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single item held by the store.
///
/// Application fields live in `fields` and are flattened into the serialized
/// form, so the durable representation looks like the plain object plus the
/// three flag members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The local copy may not reflect server state. Cleared whenever a remote
    /// write or fetch for this record succeeds.
    #[serde(default)]
    pub outdated: bool,
    /// The local copy has changes the server has not confirmed. Set by an
    /// offline write, cleared when a remote write succeeds.
    #[serde(default)]
    pub modified: bool,
    /// Evicted from durable storage to reclaim space, but retained in memory
    /// so the removal can still be communicated to the server.
    #[serde(default)]
    pub removed: bool,
    /// Application data, keyed by field name.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record from raw fields with clean flags.
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            outdated: false,
            modified: false,
            removed: false,
            fields,
        }
    }

    /// Create a record from a JSON value, which must be an object.
    ///
    /// Flag members present in the value (`outdated`, `modified`, `removed`)
    /// are absorbed into the record's flags rather than kept as fields.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Insert or replace a field.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Extract the record's identity from the field named by `identity_key`.
    ///
    /// String and integer identities are both accepted; either is rendered to
    /// the string used in durable-storage keys.
    #[must_use]
    pub fn identity(&self, identity_key: &str) -> Option<String> {
        match self.fields.get(identity_key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// True when the record needs reconciling with the server.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.outdated || self.modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    #[test]
    fn test_from_value_defaults_flags() {
        let r = record(json!({"id": "a", "val": 1}));

        assert!(!r.outdated);
        assert!(!r.modified);
        assert!(!r.removed);
        assert_eq!(r.field("val"), Some(&json!(1)));
    }

    #[test]
    fn test_from_value_absorbs_flag_members() {
        let r = record(json!({"id": "a", "outdated": true, "modified": true}));

        assert!(r.outdated);
        assert!(r.modified);
        assert!(!r.removed);
        // Flags must not leak into the field map.
        assert!(r.field("outdated").is_none());
        assert!(r.field("modified").is_none());
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(Record::from_value(json!([1, 2, 3])).is_err());
        assert!(Record::from_value(json!("plain string")).is_err());
    }

    #[test]
    fn test_identity_from_string_field() {
        let r = record(json!({"id": "order-9"}));
        assert_eq!(r.identity("id").as_deref(), Some("order-9"));
    }

    #[test]
    fn test_identity_from_number_field() {
        let r = record(json!({"id": 17}));
        assert_eq!(r.identity("id").as_deref(), Some("17"));
    }

    #[test]
    fn test_identity_missing_or_unusable() {
        let r = record(json!({"val": "x"}));
        assert!(r.identity("id").is_none());

        let r = record(json!({"id": {"nested": true}}));
        assert!(r.identity("id").is_none());
    }

    #[test]
    fn test_identity_custom_key() {
        let r = record(json!({"key": "abc", "id": "ignored"}));
        assert_eq!(r.identity("key").as_deref(), Some("abc"));
    }

    #[test]
    fn test_serialized_form_includes_flags_inline() {
        let mut r = record(json!({"id": 1, "val": "a"}));
        r.modified = true;

        let text = serde_json::to_string(&r).unwrap();
        let round: Record = serde_json::from_str(&text).unwrap();

        assert_eq!(round, r);
        assert!(text.contains("\"modified\":true"));
        assert!(text.contains("\"val\":\"a\""));
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let mut r = record(json!({"id": 1, "b": [1, 2], "a": {"x": null}}));
        r.outdated = true;
        r.removed = true;
        r.modified = true;

        let first = serde_json::to_string(&r).unwrap();
        let reparsed: Record = serde_json::from_str(&first).unwrap();
        let second = serde_json::to_string(&reparsed).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_is_dirty() {
        let mut r = record(json!({"id": 1}));
        assert!(!r.is_dirty());

        r.outdated = true;
        assert!(r.is_dirty());

        r.outdated = false;
        r.modified = true;
        assert!(r.is_dirty());
    }

    #[test]
    fn test_set_field() {
        let mut r = record(json!({"id": 1}));
        r.set_field("val", json!("b"));
        assert_eq!(r.field("val"), Some(&json!("b")));
    }
}
