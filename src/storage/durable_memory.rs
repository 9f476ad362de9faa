use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use super::traits::{DurableError, DurableStore};

/// Capacity-bounded in-memory durable store.
///
/// Stands in for a real persistence substrate in tests and single-process
/// deployments. Capacity is accounted in bytes (key length plus value
/// length); a write that would exceed it fails with
/// [`DurableError::CapacityExceeded`] and stores nothing.
pub struct BoundedDurableStore {
    max_bytes: usize,
    used_bytes: AtomicUsize,
    entries: DashMap<String, String>,
}

impl BoundedDurableStore {
    #[must_use]
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            used_bytes: AtomicUsize::new(0),
            entries: DashMap::new(),
        }
    }

    /// Current usage in bytes.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.used_bytes.load(Ordering::Acquire)
    }

    /// Current entry count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry exists under `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Read back a stored value.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn entry_size(key: &str, value: &str) -> usize {
        key.len() + value.len()
    }
}

#[async_trait]
impl DurableStore for BoundedDurableStore {
    async fn write(&self, key: &str, value: &str) -> Result<(), DurableError> {
        let new_size = Self::entry_size(key, value);
        let old_size = self
            .entries
            .get(key)
            .map(|entry| Self::entry_size(key, entry.value()))
            .unwrap_or(0);

        let projected = self
            .used_bytes
            .load(Ordering::Acquire)
            .saturating_sub(old_size)
            .saturating_add(new_size);
        if projected > self.max_bytes {
            return Err(DurableError::CapacityExceeded);
        }

        self.entries.insert(key.to_string(), value.to_string());
        let current = self.used_bytes.load(Ordering::Acquire);
        self.used_bytes.store(
            current.saturating_sub(old_size).saturating_add(new_size),
            Ordering::Release,
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), DurableError> {
        if let Some((key, value)) = self.entries.remove(key) {
            self.used_bytes
                .fetch_sub(Self::entry_size(&key, &value), Ordering::Release);
        }
        Ok(())
    }

    async fn scan(&self, fragment: &str) -> Result<Vec<(String, String)>, DurableError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.key().contains(fragment))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect())
    }
}
