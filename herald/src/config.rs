//! Runtime configuration for the herald binary

use std::{fs, path::Path, sync::Arc};

use anyhow::Context;
use herald_delivery::{Provider, RateLimitConfig, RateLimiter, RetryPolicy, SimulatedProvider};
use serde::{Deserialize, Serialize};

/// One provider entry; list order defines fallback priority.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name, recorded on delivered status records
    pub name: String,

    /// Probability that one attempt succeeds
    ///
    /// Default: 1.0
    #[serde(default = "default_success_rate")]
    pub success_rate: f64,
}

const fn default_success_rate() -> f64 {
    1.0
}

/// Top-level configuration.
///
/// Every section has defaults, so an empty (or absent) file yields a
/// working deployment: two simulated providers and the stock retry and
/// rate-limit settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ordered provider list (first = primary)
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,

    /// Per-provider retry policy
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Admission control settings for transports
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![
        ProviderConfig {
            name: "alpha".to_string(),
            success_rate: 0.7,
        },
        ProviderConfig {
            name: "bravo".to_string(),
            success_rate: 0.8,
        },
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            retry: RetryPolicy::default(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Load from `path` if given, otherwise fall back to defaults.
    ///
    /// # Errors
    /// Returns an error only when an explicit path fails to load.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Build the ordered provider list this configuration describes.
    #[must_use]
    pub fn providers(&self) -> Vec<Arc<dyn Provider>> {
        self.providers
            .iter()
            .map(|p| {
                Arc::new(SimulatedProvider::new(&p.name, p.success_rate)) as Arc<dyn Provider>
            })
            .collect()
    }

    /// Build the admission-control rate limiter this configuration
    /// describes.
    #[must_use]
    pub fn rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.rate_limit.clone())
    }
}
