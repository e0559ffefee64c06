//! Delivery orchestration
//!
//! One `deliver` call is one independent unit of work: derive the key,
//! claim it with an atomic insert, walk the provider list with the
//! retry policy, and finalize the status record. Backoff waits suspend
//! the task cooperatively; nothing blocks unrelated deliveries.

use std::sync::Arc;

use herald_common::{
    DeliveryStatus, Message, MessageKey, StatusRecord,
    tracing::{debug, info, warn},
};
use herald_store::{StatusStore, StoreError};
use tokio::time::sleep;

use crate::{
    error::DeliveryError, outcome::DeliveryOutcome, provider::Provider, retry::RetryPolicy,
};

/// Orchestrates delivery of messages across an ordered provider list.
///
/// The list order defines fallback priority: the first provider is
/// primary, the rest are fallbacks in listed order, and it is static
/// for the lifetime of the engine.
#[derive(Clone)]
pub struct DeliveryEngine {
    providers: Vec<Arc<dyn Provider>>,
    store: Arc<dyn StatusStore>,
    policy: RetryPolicy,
}

impl std::fmt::Debug for DeliveryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryEngine")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl DeliveryEngine {
    /// Create an engine over an ordered provider list.
    #[must_use]
    pub fn new(
        providers: Vec<Arc<dyn Provider>>,
        store: Arc<dyn StatusStore>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            providers,
            store,
            policy,
        }
    }

    /// Number of configured providers.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Deliver a message, deduplicating on its derived key.
    ///
    /// The pending record is claimed with a single atomic insert; a
    /// duplicate key - whether from a concurrent call or an earlier
    /// request with the same content, in any state - short-circuits to
    /// [`DeliveryOutcome::AlreadyInProgress`] without a new attempt.
    ///
    /// Provider failures never escape: they are retried, then absorbed
    /// into fallback, and total exhaustion is reported as
    /// [`DeliveryOutcome::AllFailed`].
    ///
    /// # Errors
    /// Returns [`DeliveryError::Store`] if the status store fails; no
    /// delivery outcome is claimed when it cannot be durably recorded.
    pub async fn deliver(&self, message: Message) -> Result<DeliveryOutcome, DeliveryError> {
        let key = MessageKey::derive(&message.recipient, &message.body);
        let mut record = StatusRecord::pending(key.clone(), &message);

        match self.store.insert(&record).await {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(_)) => {
                debug!(key = %key, "duplicate delivery suppressed");
                return Ok(DeliveryOutcome::AlreadyInProgress);
            }
            Err(e) => return Err(e.into()),
        }

        self.run_providers(&message, &mut record).await
    }

    /// Explicitly re-run delivery for a previously failed record.
    ///
    /// Distinct from [`Self::deliver`], which never retries an existing
    /// record: this operation acts only on records in the `failed`
    /// state, resetting them to `pending` and walking the provider list
    /// again. Records that are `pending` or `sent` short-circuit to
    /// [`DeliveryOutcome::AlreadyInProgress`].
    ///
    /// The `failed` to `pending` transition is claimed with a single
    /// conditional swap in the store, so of any number of concurrent
    /// calls for the same key exactly one re-runs the providers; the
    /// rest observe [`DeliveryOutcome::AlreadyInProgress`].
    ///
    /// # Errors
    /// - [`DeliveryError::UnknownDelivery`] if no record exists for the
    ///   key
    /// - [`DeliveryError::Store`] if the status store fails
    pub async fn redeliver(&self, key: &MessageKey) -> Result<DeliveryOutcome, DeliveryError> {
        let Some(mut record) = self.store.find(key).await? else {
            return Err(DeliveryError::UnknownDelivery(key.clone()));
        };

        if record.status != DeliveryStatus::Failed {
            return Ok(DeliveryOutcome::AlreadyInProgress);
        }

        record.status = DeliveryStatus::Pending;
        record.provider = None;
        match self
            .store
            .update_if_status(key, &DeliveryStatus::Failed, &record)
            .await
        {
            Ok(()) => {}
            // Another caller claimed the record between the read and
            // the swap, or delivery already settled it.
            Err(StoreError::StatusConflict(_)) => {
                debug!(key = %key, "concurrent redelivery suppressed");
                return Ok(DeliveryOutcome::AlreadyInProgress);
            }
            Err(e) => return Err(e.into()),
        }

        info!(key = %key, attempts = record.attempts, "redelivering failed message");

        let message = record.message();
        self.run_providers(&message, &mut record).await
    }

    /// Walk the provider list in priority order, applying the retry
    /// policy to each and finalizing the record on the way out.
    async fn run_providers(
        &self,
        message: &Message,
        record: &mut StatusRecord,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        let last = self.providers.len().saturating_sub(1);

        for (index, provider) in self.providers.iter().enumerate() {
            match self.policy.run(|| provider.send(message)).await {
                Ok(()) => {
                    record.mark_sent(provider.name());
                    self.store.update(&record.key, record).await?;

                    info!(
                        key = %record.key,
                        provider = provider.name(),
                        "message delivered"
                    );

                    return Ok(DeliveryOutcome::Sent {
                        provider: provider.name().to_string(),
                    });
                }
                Err(error) => {
                    record.attempts += 1;

                    warn!(
                        key = %record.key,
                        provider = provider.name(),
                        %error,
                        "provider exhausted, falling back"
                    );

                    if index == last {
                        record.mark_failed();
                        self.store.update(&record.key, record).await?;
                        return Ok(DeliveryOutcome::AllFailed);
                    }

                    self.store.update(&record.key, record).await?;

                    // Inter-provider backoff: exponential in the index
                    // of the provider just exhausted, independent of
                    // the per-attempt schedule inside the retry policy.
                    let index = u32::try_from(index).unwrap_or(u32::MAX);
                    sleep(self.policy.backoff_delay(index)).await;
                }
            }
        }

        // Empty provider list: nothing to attempt
        record.mark_failed();
        self.store.update(&record.key, record).await?;
        Ok(DeliveryOutcome::AllFailed)
    }
}
