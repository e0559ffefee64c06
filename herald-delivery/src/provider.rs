//! The delivery provider capability
//!
//! Providers are interchangeable backends, each capable of one thing:
//! attempting to hand off a message. The engine treats them uniformly
//! through the [`Provider`] trait and never inspects how an attempt is
//! carried out.

use async_trait::async_trait;
use herald_common::Message;
use rand::Rng;
use tracing::debug;

use crate::error::ProviderError;

/// An interchangeable delivery backend.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable name, recorded on the status record on success.
    fn name(&self) -> &str;

    /// Attempt to deliver one message.
    ///
    /// # Errors
    /// Returns a [`ProviderError`] describing the failed attempt. The
    /// caller decides whether to retry.
    async fn send(&self, message: &Message) -> Result<(), ProviderError>;
}

/// A provider with a configurable, independent success probability.
///
/// Stands in for a real transport in demos and tests; each `send` rolls
/// against `success_rate` and fails the attempt on a miss.
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    name: String,
    success_rate: f64,
}

impl SimulatedProvider {
    /// Create a provider succeeding with probability `success_rate`,
    /// clamped to `[0.0, 1.0]`.
    #[must_use]
    pub fn new(name: impl Into<String>, success_rate: f64) -> Self {
        Self {
            name: name.into(),
            success_rate: success_rate.clamp(0.0, 1.0),
        }
    }

    /// The configured success probability.
    #[must_use]
    pub const fn success_rate(&self) -> f64 {
        self.success_rate
    }
}

#[async_trait]
impl Provider for SimulatedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send(&self, message: &Message) -> Result<(), ProviderError> {
        if rand::rng().random::<f64>() < self.success_rate {
            debug!(
                provider = %self.name,
                recipient = %message.recipient,
                "message handed off"
            );
            Ok(())
        } else {
            Err(ProviderError::new(
                &self.name,
                "simulated transport failure",
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn message() -> Message {
        Message::new("user@example.com", "Subject", "Body")
    }

    #[tokio::test]
    async fn test_certain_success() {
        let provider = SimulatedProvider::new("alpha", 1.0);
        assert!(provider.send(&message()).await.is_ok());
    }

    #[tokio::test]
    async fn test_certain_failure() {
        let provider = SimulatedProvider::new("alpha", 0.0);
        let error = provider.send(&message()).await.unwrap_err();
        assert_eq!(error.provider, "alpha");
    }

    #[test]
    fn test_rate_clamped() {
        assert!((SimulatedProvider::new("a", 1.7).success_rate() - 1.0).abs() < f64::EPSILON);
        assert!(SimulatedProvider::new("a", -0.3).success_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn test_rng_in_unit_range() {
        // The roll must be comparable against a [0, 1] rate.
        let mut rng = rand::rng();
        for _ in 0..100 {
            let roll: f64 = rng.random();
            assert!((0.0..1.0).contains(&roll));
        }
    }
}
