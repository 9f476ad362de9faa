//! Query filters and options.
//!
//! A [`Filter`] is a set of field/value equality pairs, matching the shape
//! callers pass to the store's `query` operation. An empty filter matches
//! every record. [`QueryOptions`] carries result windowing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::record::Record;

/// Field-equality filter over records.
///
/// ```
/// use offline_store::{Filter, Record};
/// use serde_json::json;
///
/// let filter = Filter::new().field("status", json!("open"));
/// let record = Record::from_value(json!({"id": 1, "status": "open"})).unwrap();
/// assert!(filter.matches(&record));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter(Map<String, Value>);

impl Filter {
    /// An empty filter, matching all records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    /// Whether every condition holds for `record`.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.0
            .iter()
            .all(|(name, value)| record.field(name) == Some(value))
    }

    /// The raw condition pairs, for remote adapters that encode them onto the
    /// wire themselves.
    #[must_use]
    pub fn conditions(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Result-set windowing for `query`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Number of leading matches to skip.
    #[serde(default)]
    pub start: Option<usize>,
    /// Maximum number of matches to return.
    #[serde(default)]
    pub count: Option<usize>,
}

impl QueryOptions {
    /// Apply the window to an already-filtered result set.
    #[must_use]
    pub fn window(&self, records: Vec<Record>) -> Vec<Record> {
        let start = self.start.unwrap_or(0);
        records
            .into_iter()
            .skip(start)
            .take(self.count.unwrap_or(usize::MAX))
            .collect()
    }
}
