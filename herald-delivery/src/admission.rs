//! Admission-control rate limiting for inbound delivery requests
//!
//! This sits in front of the engine: transports consult it before
//! handing a request over, and the engine itself never does. State is
//! scoped to the [`RateLimiter`] instance - there are no module-level
//! globals - and can be reset explicitly, which tests rely on.
//!
//! # Sliding Window
//!
//! Each client keeps the timestamps of its recent requests. A request
//! is admitted while fewer than `max_requests` timestamps fall inside
//! the trailing window; admitted requests append their own timestamp.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for admission control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum requests per client inside one window
    ///
    /// Default: 10
    #[serde(default = "default_max_requests")]
    pub max_requests: usize,

    /// Window length in seconds
    ///
    /// Default: 60
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

const fn default_max_requests() -> usize {
    10
}

const fn default_window_secs() -> u64 {
    60
}

/// Admission decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Under the limit; the request was counted and may proceed
    Allowed,
    /// Over the limit; the request was not counted
    Limited,
}

/// Per-client sliding-window rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    config: RateLimitConfig,
    /// Per-client request timestamps
    windows: DashMap<String, Arc<Mutex<Vec<Instant>>>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: DashMap::new(),
        }
    }

    /// Decide whether a request from `client` may proceed.
    pub fn check(&self, client: &str) -> Admission {
        let now = Instant::now();
        let window = Duration::from_secs(self.config.window_secs);

        let stamps = self
            .windows
            .entry(client.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone();
        let mut stamps = stamps.lock();

        stamps.retain(|ts| now.duration_since(*ts) < window);

        if stamps.len() >= self.config.max_requests {
            debug!(client, requests = stamps.len(), "request rate limited");
            return Admission::Limited;
        }

        stamps.push(now);
        Admission::Allowed
    }

    /// Drop all recorded state for every client.
    pub fn reset(&self) {
        self.windows.clear();
    }

    /// Drop the recorded state for one client.
    pub fn reset_client(&self, client: &str) {
        self.windows.remove(client);
    }

    /// Number of clients with recorded state.
    #[must_use]
    pub fn client_count(&self) -> usize {
        self.windows.len()
    }
}
