//! The immutable delivery request

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single message to be delivered.
///
/// This is the input to the delivery engine. It is never persisted
/// directly; the engine derives a [`crate::MessageKey`] from it and
/// stores a [`crate::StatusRecord`] instead.
///
/// The body is held behind an `Arc` so that cloning a message (or
/// copying its content into a status record) does not copy the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Destination address
    pub recipient: String,
    /// Subject line
    pub subject: String,
    /// Message payload (Arc for cheap cloning)
    pub body: Arc<str>,
}

impl Message {
    /// Create a new message.
    #[must_use]
    pub fn new(
        recipient: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
        }
    }
}
