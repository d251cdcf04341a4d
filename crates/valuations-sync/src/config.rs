//! # Sync Configuration
//!
//! Configuration for one property sync run.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VALUATIONS_PROPERTIES_URL=https://api.example.com/properties       │
//! │     VALUATIONS_REQUEST_TIMEOUT_SECS=30                                 │
//! │     VALUATIONS_DB_PATH=/var/lib/valuations/valuations.db               │
//! │     VALUATIONS_DB_MAX_CONNECTIONS=5                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/valuations/sync.toml (Linux)                             │
//! │     ~/Library/Application Support/com.valuations.valuations/sync.toml  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     timeout 30s, valuations.db, 5 connections                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The value is built once at startup and passed by reference into the
//! engine; nothing reads it globally.
//!
//! ## Configuration File Format
//! ```toml
//! # sync.toml
//! [source]
//! properties_url = "https://api.example.com/api/properties"
//! request_timeout_secs = 30
//!
//! [database]
//! path = "valuations.db"
//! max_connections = 5
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SyncError, SyncResult};

pub const ENV_PROPERTIES_URL: &str = "VALUATIONS_PROPERTIES_URL";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "VALUATIONS_REQUEST_TIMEOUT_SECS";
pub const ENV_DB_PATH: &str = "VALUATIONS_DB_PATH";
pub const ENV_DB_MAX_CONNECTIONS: &str = "VALUATIONS_DB_MAX_CONNECTIONS";

// =============================================================================
// Source Settings
// =============================================================================

/// Where the external property collection lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSettings {
    /// First page of the paginated property collection.
    #[serde(default)]
    pub properties_url: String,

    /// Per-request timeout in seconds. Applies to every page fetch.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            properties_url: String::new(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

// =============================================================================
// Database Settings
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("valuations.db")
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete sync configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub source: SourceSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

impl SyncConfig {
    /// Config for a given source URL with every other value defaulted.
    pub fn for_url(properties_url: impl Into<String>) -> Self {
        Self {
            source: SourceSettings {
                properties_url: properties_url.into(),
                ..SourceSettings::default()
            },
            ..Self::default()
        }
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (sync.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading sync config from file");
                let contents = std::fs::read_to_string(&path).map_err(|e| {
                    SyncError::Config(format!("cannot read {}: {e}", path.display()))
                })?;
                config = Self::from_toml(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing keys take their defaults.
    pub fn from_toml(contents: &str) -> SyncResult<Self> {
        toml::from_str(contents).map_err(|e| SyncError::Config(format!("invalid TOML: {e}")))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        if self.source.properties_url.trim().is_empty() {
            return Err(SyncError::Config(format!(
                "source.properties_url is required (or set {ENV_PROPERTIES_URL})"
            )));
        }

        let url = Url::parse(&self.source.properties_url).map_err(|e| {
            SyncError::Config(format!(
                "invalid properties URL {:?}: {e}",
                self.source.properties_url
            ))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SyncError::Config(format!(
                "properties URL must use http or https, got: {}",
                url.scheme()
            )));
        }

        if self.source.request_timeout_secs == 0 {
            return Err(SyncError::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(SyncError::Config(
                "max_connections must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// [`SyncConfig::load`]). Unparseable numbers are ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_PROPERTIES_URL) {
            debug!(url = %url, "Overriding properties URL from environment");
            self.source.properties_url = url;
        }

        if let Some(raw) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            match raw.parse::<u64>() {
                Ok(secs) => self.source.request_timeout_secs = secs,
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_REQUEST_TIMEOUT_SECS),
            }
        }

        if let Some(path) = lookup(ENV_DB_PATH) {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Some(raw) = lookup(ENV_DB_MAX_CONNECTIONS) {
            match raw.parse::<u32>() {
                Ok(max) => self.database.max_connections = max,
                Err(_) => warn!(value = %raw, "Ignoring invalid {}", ENV_DB_MAX_CONNECTIONS),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "valuations", "valuations")
            .map(|dirs| dirs.config_dir().join("sync.toml"))
    }

    /// Per-request timeout as a [`Duration`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.source.request_timeout_secs, 30);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.database.path, PathBuf::from("valuations.db"));
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = SyncConfig::from_toml(
            r#"
            [source]
            properties_url = "https://api.example.com/api/properties"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.source.properties_url,
            "https://api.example.com/api/properties"
        );
        assert_eq!(config.source.request_timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        let err = SyncConfig::from_toml("[source\nproperties_url =").unwrap_err();
        assert!(matches!(err, SyncError::Config(_)));
    }

    #[test]
    fn test_config_validation() {
        let mut config = SyncConfig::default();

        // URL is required
        assert!(config.validate().is_err());

        config.source.properties_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.source.properties_url = "ftp://files.example.com/properties".to_string();
        assert!(config.validate().is_err());

        config.source.properties_url = "http://localhost:8080/api/properties".to_string();
        assert!(config.validate().is_ok());

        config.source.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_PROPERTIES_URL, "https://override.example.com/properties"),
            (ENV_REQUEST_TIMEOUT_SECS, "5"),
            (ENV_DB_PATH, "/tmp/override.db"),
            (ENV_DB_MAX_CONNECTIONS, "many"),
        ]);

        let mut config = SyncConfig::for_url("https://file.example.com/properties");
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.source.properties_url,
            "https://override.example.com/properties"
        );
        assert_eq!(config.source.request_timeout_secs, 5);
        assert_eq!(config.database.path, PathBuf::from("/tmp/override.db"));
        // Unparseable value leaves the default in place.
        assert_eq!(config.database.max_connections, 5);
    }

    #[test]
    fn test_toml_serialization() {
        let config = SyncConfig::for_url("https://api.example.com/properties");
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[database]"));
    }
}
