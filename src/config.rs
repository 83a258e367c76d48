//! Configuration Module
//!
//! Handles loading service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cached reads before FIFO eviction
    pub max_entries: usize,
    /// Lifetime of a cached read in seconds
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-entry sweep interval in seconds
    pub cleanup_interval: u64,
    /// JSON file seeding the in-memory backend
    pub seed_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 100)
    /// - `CACHE_DEFAULT_TTL_SECS` - Cached read lifetime in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `CONTENT_SEED_PATH` - Optional seed file for the in-memory backend
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            max_entries: parse_var("CACHE_MAX_ENTRIES").unwrap_or(defaults.max_entries),
            default_ttl: parse_var("CACHE_DEFAULT_TTL_SECS").unwrap_or(defaults.default_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            seed_path: env::var("CONTENT_SEED_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 100,
            default_ttl: 300,
            server_port: 3000,
            cleanup_interval: 60,
            seed_path: None,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
