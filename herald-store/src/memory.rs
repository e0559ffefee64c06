use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use herald_common::{DeliveryStatus, MessageKey, StatusRecord};

use crate::{StoreError, r#trait::StatusStore};

/// In-memory status store implementation
///
/// Records live in a `HashMap` protected by an `RwLock`. This is the
/// backend injected in tests, and it doubles as a transient store for
/// deployments that accept losing delivery history on restart.
/// Production deployments should back [`StatusStore`] with a database
/// that offers a unique index on the key.
///
/// # Capacity Management
/// The store can be configured with a maximum capacity to prevent
/// unbounded memory growth. When capacity is reached, inserts fail.
///
/// # Concurrency
/// `insert` takes the write lock for the whole check-and-insert, so the
/// uniqueness guarantee holds under concurrent callers.
#[derive(Debug, Clone)]
pub struct MemoryStatusStore {
    records: Arc<RwLock<HashMap<MessageKey, StatusRecord>>>,
    /// Maximum number of records to store (None = unlimited)
    capacity: Option<usize>,
}

impl MemoryStatusStore {
    /// Create a new empty store with unlimited capacity
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            capacity: None,
        }
    }

    /// Create a new store with a capacity limit
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            capacity: Some(capacity),
        }
    }

    /// Get the current number of records in the store
    ///
    /// Recovers gracefully if the lock is poisoned by accessing the
    /// underlying data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the configured capacity (None = unlimited)
    #[must_use]
    pub const fn capacity(&self) -> Option<usize> {
        self.capacity
    }
}

impl Default for MemoryStatusStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn find(&self, key: &MessageKey) -> crate::Result<Option<StatusRecord>> {
        Ok(self.records.read()?.get(key).cloned())
    }

    async fn insert(&self, record: &StatusRecord) -> crate::Result<()> {
        // One write lock for the whole check-and-insert: the uniqueness
        // guarantee is only as good as this being atomic.
        let mut records = self.records.write()?;

        if records.contains_key(&record.key) {
            return Err(StoreError::AlreadyExists(record.key.clone()));
        }

        if let Some(cap) = self.capacity
            && records.len() >= cap
        {
            return Err(StoreError::Internal(format!(
                "Memory store capacity exceeded: {}/{} records",
                records.len(),
                cap
            )));
        }

        records.insert(record.key.clone(), record.clone());

        Ok(())
    }

    async fn update(&self, key: &MessageKey, record: &StatusRecord) -> crate::Result<()> {
        let mut records = self.records.write()?;

        if records.contains_key(key) {
            records.insert(key.clone(), record.clone());
            Ok(())
        } else {
            Err(StoreError::NotFound(key.clone()))
        }
    }

    async fn update_if_status(
        &self,
        key: &MessageKey,
        expected: &DeliveryStatus,
        record: &StatusRecord,
    ) -> crate::Result<()> {
        // One write lock for the whole compare-and-swap: concurrent
        // callers expecting the same status get exactly one winner.
        let mut records = self.records.write()?;

        let Some(current) = records.get(key) else {
            return Err(StoreError::NotFound(key.clone()));
        };

        if current.status != *expected {
            return Err(StoreError::StatusConflict(key.clone()));
        }

        records.insert(key.clone(), record.clone());

        Ok(())
    }
}
