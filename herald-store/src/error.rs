//! Error types for the herald-store crate.

use herald_common::MessageKey;
use thiserror::Error;

/// Top-level store error type.
///
/// `AlreadyExists`, `NotFound`, and `StatusConflict` are contract
/// signals the delivery engine handles; the remaining variants are
/// fatal to the request and propagate to the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this key already exists (atomic insert rejected).
    #[error("record already exists: {0}")]
    AlreadyExists(MessageKey),

    /// No record with this key exists.
    #[error("record not found: {0}")]
    NotFound(MessageKey),

    /// A conditional update was rejected: the stored record's status
    /// no longer matches the expected one.
    #[error("record status changed: {0}")]
    StatusConflict(MessageKey),

    /// The store cannot be reached or refused the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Internal error (lock poisoning, capacity, etc.).
    #[error("internal store error: {0}")]
    Internal(String),
}

/// Specialized `Result` type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

// Convenience conversion for lock poisoning
impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        Self::Internal(format!("Lock poisoned: {e}"))
    }
}
