//! The status store capability consumed by the delivery engine

use async_trait::async_trait;
use herald_common::{DeliveryStatus, MessageKey, StatusRecord};

use crate::Result;

/// Keyed persistence surface for delivery status records.
///
/// Implementations must make `insert` atomic: inserting a key that
/// already exists fails with [`crate::StoreError::AlreadyExists`]
/// without modifying the stored record. The delivery engine relies on
/// this as its sole dedupe mechanism; there is no separate
/// check-then-insert sequence to race against.
///
/// Side effects are durable (to whatever degree the backend provides)
/// once a call returns.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Look up the record for a key, if any.
    async fn find(&self, key: &MessageKey) -> Result<Option<StatusRecord>>;

    /// Insert a new record, failing if the key already exists.
    async fn insert(&self, record: &StatusRecord) -> Result<()>;

    /// Replace the record for an existing key.
    ///
    /// Fails with [`crate::StoreError::NotFound`] if no record exists.
    async fn update(&self, key: &MessageKey, record: &StatusRecord) -> Result<()>;

    /// Replace the record only if its stored status equals `expected`.
    ///
    /// The compare and the swap are one atomic operation: of any number
    /// of concurrent callers expecting the same status, exactly one
    /// succeeds and the rest observe the conflict. Status transitions
    /// that must be claimed by a single caller go through here.
    ///
    /// Fails with [`crate::StoreError::NotFound`] if no record exists,
    /// or [`crate::StoreError::StatusConflict`] if the stored status
    /// differs from `expected`.
    async fn update_if_status(
        &self,
        key: &MessageKey,
        expected: &DeliveryStatus,
        record: &StatusRecord,
    ) -> Result<()>;
}
