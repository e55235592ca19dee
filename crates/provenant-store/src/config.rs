//! Store configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Store configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// What deleting a node does to edges that still reference it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeDeletePolicy {
    /// Delete incident edges and their provenance with the node
    #[default]
    Cascade,
    /// Refuse with a referential error while any edge references the node
    Restrict,
}

/// Configuration for [`crate::SqliteStore`]
///
/// # Examples
///
/// ```
/// use provenant_store::{NodeDeletePolicy, StoreConfig};
///
/// let config = StoreConfig::from_toml(r#"
///     path = "graph.db"
///     node_delete_policy = "restrict"
/// "#).unwrap();
/// assert_eq!(config.node_delete_policy, NodeDeletePolicy::Restrict);
/// assert!(config.wal);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Database file; `:memory:` for a private in-memory database
    pub path: PathBuf,

    /// How long a writer waits on a locked database (milliseconds)
    /// Default: 5000
    pub busy_timeout_ms: u64,

    /// Use write-ahead logging so readers never block the writer
    /// Default: true (ignored for in-memory databases)
    pub wal: bool,

    /// Enforce edge endpoint foreign keys in SQLite as well as in code
    /// Default: true
    pub enforce_foreign_keys: bool,

    /// Behavior of node deletion toward incident edges
    /// Default: cascade
    pub node_delete_policy: NodeDeletePolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("provenant.db"),
            busy_timeout_ms: 5000,
            wal: true,
            enforce_foreign_keys: true,
            node_delete_policy: NodeDeletePolicy::Cascade,
        }
    }
}

impl StoreConfig {
    /// In-memory database, for tests and scratch work
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(":memory:"),
            wal: false,
            ..Self::default()
        }
    }

    /// Default configuration for a database file
    pub fn at<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Parse from TOML text and validate
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: StoreConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                field: "path",
                reason: "must not be empty".to_string(),
            });
        }
        if self.busy_timeout_ms > 600_000 {
            return Err(ConfigError::Invalid {
                field: "busy_timeout_ms",
                reason: format!("{} exceeds the 10 minute ceiling", self.busy_timeout_ms),
            });
        }
        Ok(())
    }

    /// Whether this names a private in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }

    /// Busy timeout as Duration
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.busy_timeout_ms, 5000);
        assert!(config.wal);
        assert!(config.enforce_foreign_keys);
        assert_eq!(config.node_delete_policy, NodeDeletePolicy::Cascade);
        assert!(!config.is_in_memory());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(StoreConfig::from_toml("").unwrap(), StoreConfig::default());
    }

    #[test]
    fn test_in_memory_preset() {
        let config = StoreConfig::in_memory();
        assert!(config.is_in_memory());
        assert!(!config.wal);
    }

    #[test]
    fn test_validation() {
        let err = StoreConfig::from_toml("busy_timeout_ms = 9999999").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "busy_timeout_ms", .. }));

        let err = StoreConfig::from_toml("path = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "path", .. }));

        assert!(matches!(
            StoreConfig::from_toml("node_delete_policy = \"orphan\""),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("store.toml");
        std::fs::write(&file, "wal = false\nbusy_timeout_ms = 250\n").unwrap();

        let config = StoreConfig::from_file(&file).unwrap();
        assert!(!config.wal);
        assert_eq!(config.busy_timeout(), Duration::from_millis(250));

        assert!(matches!(
            StoreConfig::from_file(dir.path().join("missing.toml")),
            Err(ConfigError::FileRead(_))
        ));
    }
}
