//! Delivery orchestration engine for herald
//!
//! This crate provides functionality to:
//! - Derive an idempotency key per request and suppress duplicates
//!   through the status store's atomic insert
//! - Retry each provider with exponential backoff
//! - Fall back through the provider list in priority order
//! - Finalize the persisted status record on success or exhaustion
//!
//! It also hosts the admission-control rate limiter consulted by
//! transports before they hand a request to the engine.

pub mod admission;
mod engine;
mod error;
mod outcome;
pub mod provider;
pub mod retry;

pub use admission::{Admission, RateLimitConfig, RateLimiter};
pub use engine::DeliveryEngine;
pub use error::{DeliveryError, ProviderError, RetryError};
pub use outcome::DeliveryOutcome;
pub use provider::{Provider, SimulatedProvider};
pub use retry::RetryPolicy;
