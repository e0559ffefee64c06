//! Shared types for the herald delivery service
//!
//! This crate holds everything the other herald crates agree on:
//! - The [`Message`] input type
//! - Idempotency key derivation ([`MessageKey`])
//! - The persisted delivery record ([`StatusRecord`]) and its
//!   [`DeliveryStatus`] lifecycle
//! - Logging initialization and macros

pub mod key;
pub mod logging;
pub mod message;
pub mod status;

pub use key::MessageKey;
pub use message::Message;
pub use status::{DeliveryStatus, StatusRecord};
pub use tracing;
