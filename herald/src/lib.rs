//! herald - a resilient message delivery service
//!
//! Wires the delivery engine to runtime configuration: an ordered
//! provider list, the retry policy, and admission control, all loadable
//! from a TOML file.

pub mod config;

pub use config::{Config, ProviderConfig};
