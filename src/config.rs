//! Configuration Module
//!
//! Cache configuration with defaults and environment variable loading.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default sweeper interval
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

/// Cache configuration parameters.
///
/// Immutable for the lifetime of the cache it builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Time between background sweeper passes; must be non-zero
    pub cleanup_interval: Duration,
    /// Maximum number of live entries, 0 = unbounded
    pub max_size: usize,
}

impl CacheConfig {
    /// Creates a config with an explicit interval and capacity.
    pub fn new(cleanup_interval: Duration, max_size: usize) -> Self {
        Self {
            cleanup_interval,
            max_size,
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Sweeper interval in milliseconds (default: 1000)
    /// - `CACHE_MAX_SIZE` - Maximum entries, 0 for unbounded (default: 0)
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cleanup_interval: env::var("CACHE_CLEANUP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.cleanup_interval),
            max_size: env::var("CACHE_MAX_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_size),
        }
    }

    /// Checks the configuration contract.
    ///
    /// A zero interval would turn the sweeper into a busy loop holding the
    /// write lock, so it is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.cleanup_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "cleanup_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns true when no capacity bound is configured.
    pub fn is_unbounded(&self) -> bool {
        self.max_size == 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            max_size: 0,
        }
    }
}
