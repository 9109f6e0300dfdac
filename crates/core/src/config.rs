//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Deployment environment.
///
/// Controls how much detail server errors expose to clients.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Error responses include raw diagnostic details.
    #[default]
    Development,
    /// Error responses carry only a generic message.
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Deployment environment (default: development).
    #[serde(default)]
    pub environment: Environment,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            environment: Environment::default(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database.
    Sqlite {
        /// Database file path.
        path: PathBuf,
        /// Query timeout in seconds (advisory only - SQLite cannot force-cancel queries).
        #[serde(default = "default_sqlite_query_timeout_secs")]
        query_timeout_secs: Option<u64>,
    },
}

fn default_sqlite_query_timeout_secs() -> Option<u64> {
    Some(30)
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/catalog.db"),
            query_timeout_secs: default_sqlite_query_timeout_secs(),
        }
    }
}

/// Read cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of cached read results in seconds (default: 5 minutes).
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,
    /// Interval in seconds between sweeps of expired entries (default: 60).
    #[serde(default = "default_cache_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_cleanup_interval_secs() -> u64 {
    60
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            cleanup_interval_secs: default_cache_cleanup_interval_secs(),
        }
    }
}

impl CacheConfig {
    /// Validate cache configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        if self.ttl_secs == 0 {
            return Err("cache.ttl_secs must be greater than zero".to_string());
        }
        Ok(())
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Sweep interval; a zero setting falls back to the default so that
    /// `tokio::time::interval` never receives a zero period.
    pub fn cleanup_interval(&self) -> Duration {
        if self.cleanup_interval_secs == 0 {
            Duration::from_secs(default_cache_cleanup_interval_secs())
        } else {
            Duration::from_secs(self.cleanup_interval_secs)
        }
    }
}

/// Admin access configuration.
///
/// Admin routes (product management, moderation) are only reachable when a
/// token hash is configured.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AdminConfig {
    /// SHA-256 hex digest of the admin bearer token.
    /// Generate with: `echo -n "your-secret-token" | sha256sum`
    #[serde(default)]
    pub token_hash: Option<String>,
}

impl AdminConfig {
    /// Create a test configuration.
    ///
    /// **For testing only.** The hash is SHA-256 of "test-admin-token".
    pub fn for_testing() -> Self {
        Self {
            token_hash: Some(
                "17d6bfe05d1b1fb7bc499f8e3f639c7b3eda4c40f321eef8887a0c04c89a99c5".to_string(),
            ),
        }
    }
}

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Read cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Admin access configuration.
    #[serde(default)]
    pub admin: AdminConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses default SQLite metadata and the test admin token.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            metadata: MetadataConfig::default(),
            cache: CacheConfig::default(),
            admin: AdminConfig::for_testing(),
        }
    }
}
