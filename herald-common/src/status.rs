//! Persisted delivery status

use std::{fmt, sync::Arc, time::SystemTime};

use serde::{Deserialize, Serialize};

use crate::{Message, MessageKey};

/// Lifecycle state of a delivery record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Record created, providers not yet exhausted or successful
    Pending,
    /// Delivered by one provider
    Sent,
    /// Every provider exhausted its retry budget
    Failed,
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Sent => f.write_str("sent"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// The durable record of one delivery request.
///
/// Exactly one record exists per [`MessageKey`]; the store's atomic
/// insert enforces this. The record is created `pending` and mutated in
/// place as providers are attempted:
/// - `attempts` increments once per provider whose retry budget is
///   exhausted
/// - `provider` and `status` are set on the first successful send, or
///   `status` becomes `failed` once every provider is exhausted
///
/// The core never deletes records; retention is an external concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRecord {
    pub key: MessageKey,
    pub recipient: String,
    pub subject: String,
    pub body: Arc<str>,
    /// Name of the provider that delivered the message, once sent
    pub provider: Option<String>,
    pub status: DeliveryStatus,
    /// Number of providers that exhausted their retry budget
    pub attempts: u32,
    /// Unix timestamp (seconds) when the record was created
    pub created_at: u64,
}

impl StatusRecord {
    /// Create a fresh `pending` record for a message.
    #[must_use]
    pub fn pending(key: MessageKey, message: &Message) -> Self {
        let created_at = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        Self {
            key,
            recipient: message.recipient.clone(),
            subject: message.subject.clone(),
            body: Arc::clone(&message.body),
            provider: None,
            status: DeliveryStatus::Pending,
            attempts: 0,
            created_at,
        }
    }

    /// Rebuild the message this record was created from.
    #[must_use]
    pub fn message(&self) -> Message {
        Message {
            recipient: self.recipient.clone(),
            subject: self.subject.clone(),
            body: Arc::clone(&self.body),
        }
    }

    /// Mark the record as delivered by `provider`.
    pub fn mark_sent(&mut self, provider: &str) {
        self.status = DeliveryStatus::Sent;
        self.provider = Some(provider.to_string());
    }

    /// Mark the record as terminally failed.
    pub fn mark_failed(&mut self) {
        self.status = DeliveryStatus::Failed;
    }
}
