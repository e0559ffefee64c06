//! Typed error handling for delivery operations.
//!
//! Three tiers, absorbed at three levels:
//! - [`ProviderError`] - one attempt's failure; absorbed by the retry
//!   loop
//! - [`RetryError`] - a provider's whole budget spent; absorbed by the
//!   engine's fallback loop
//! - [`DeliveryError`] - fatal to the request; the only tier that
//!   escapes to the caller

use herald_common::MessageKey;
use herald_store::StoreError;
use thiserror::Error;

/// A single provider attempt's failure.
#[derive(Debug, Error)]
#[error("provider {provider} failed: {reason}")]
pub struct ProviderError {
    pub provider: String,
    pub reason: String,
}

impl ProviderError {
    /// Create a new provider error.
    #[must_use]
    pub fn new(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            reason: reason.into(),
        }
    }
}

/// Outcome of a retry loop that never succeeded.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// The final attempt failed; `source` is that failure.
    #[error("retry budget exhausted after {attempts} attempt(s): {source}")]
    Exhausted { attempts: u32, source: E },

    /// The budget was zero; the operation was never invoked.
    #[error("retry budget is zero; operation not attempted")]
    ZeroBudget,
}

/// Top-level delivery error type.
///
/// Provider and retry failures never surface here; they are recorded on
/// the status record and reported through
/// [`crate::DeliveryOutcome::AllFailed`]. What remains is the class of
/// failures the engine cannot absorb: the store misbehaving, or an
/// explicit operation against a key that does not exist.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The status store failed; the outcome could not be durably
    /// recorded, so no delivery outcome is claimed.
    #[error("status store failure: {0}")]
    Store(#[from] StoreError),

    /// An explicit redelivery referenced a key with no record.
    #[error("no delivery record for key: {0}")]
    UnknownDelivery(MessageKey),
}

impl DeliveryError {
    /// Returns `true` if this error originated in the status store.
    #[must_use]
    pub const fn is_store(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
