//! The three terminal outcomes of a delivery request

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of one `deliver` (or `redeliver`) invocation.
///
/// Always returned as a structured value; exhaustion of every provider
/// is an outcome, not an error. The `Display` strings are the
/// user-facing contract surface relayed by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// A record for this key already exists (pending, sent, or failed);
    /// no new attempt was made.
    AlreadyInProgress,
    /// Delivered by the named provider.
    Sent { provider: String },
    /// Every provider exhausted its retry budget.
    AllFailed,
}

impl DeliveryOutcome {
    /// Returns `true` if the message was handed off to a provider.
    #[must_use]
    pub const fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

impl fmt::Display for DeliveryOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInProgress => f.write_str("Already sent or in progress"),
            Self::Sent { provider } => write!(f, "Email sent via {provider}"),
            Self::AllFailed => f.write_str("All providers failed"),
        }
    }
}
