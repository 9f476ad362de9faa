use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::warn;

use super::traits::MemoryIndex;
use crate::query::{Filter, QueryOptions};
use crate::record::Record;

#[derive(Default)]
struct Inner {
    /// Records in insertion order, oldest first.
    items: Vec<Record>,
    /// Identity → slot in `items`.
    slots: HashMap<String, usize>,
}

/// Insertion-ordered in-memory index.
///
/// The default [`MemoryIndex`](super::traits::MemoryIndex) implementation:
/// a vector in insertion order plus an identity-to-slot map. Upserting an
/// existing identity replaces the record in place, keeping its age for the
/// purge policy's oldest-first selection.
pub struct OrderedMemoryIndex {
    identity_key: String,
    inner: RwLock<Inner>,
}

impl OrderedMemoryIndex {
    #[must_use]
    pub fn new(identity_key: impl Into<String>) -> Self {
        Self {
            identity_key: identity_key.into(),
            inner: RwLock::new(Inner::default()),
        }
    }

    /// Clear all records.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        inner.items.clear();
        inner.slots.clear();
    }
}

impl MemoryIndex for OrderedMemoryIndex {
    fn lookup(&self, id: &str) -> Option<Record> {
        let inner = self.inner.read();
        let slot = *inner.slots.get(id)?;
        Some(inner.items[slot].clone())
    }

    fn upsert(&self, record: Record) {
        let Some(id) = record.identity(&self.identity_key) else {
            warn!(identity_key = %self.identity_key, "dropping record with no identity field");
            return;
        };
        let mut inner = self.inner.write();
        match inner.slots.get(&id).copied() {
            Some(slot) => inner.items[slot] = record,
            None => {
                let slot = inner.items.len();
                inner.items.push(record);
                inner.slots.insert(id, slot);
            }
        }
    }

    fn query(&self, filter: &Filter, options: &QueryOptions) -> Vec<Record> {
        let inner = self.inner.read();
        let matches: Vec<Record> = inner
            .items
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect();
        options.window(matches)
    }

    fn load_all(&self, records: Vec<Record>) {
        let mut inner = self.inner.write();
        inner.items.clear();
        inner.slots.clear();
        for record in records {
            let Some(id) = record.identity(&self.identity_key) else {
                warn!(identity_key = %self.identity_key, "skipping rehydrated record with no identity field");
                continue;
            };
            match inner.slots.get(&id).copied() {
                Some(slot) => inner.items[slot] = record,
                None => {
                    let slot = inner.items.len();
                    inner.items.push(record);
                    inner.slots.insert(id, slot);
                }
            }
        }
    }

    fn ordered_items(&self) -> Vec<Record> {
        self.inner.read().items.clone()
    }

    fn len(&self) -> usize {
        self.inner.read().items.len()
    }
}
