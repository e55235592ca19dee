//! Configuration for the Migrator

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the Migrator
///
/// # Examples
///
/// ```
/// use provenant_migrate::MigrationConfig;
///
/// let config = MigrationConfig::from_toml("record_ordering_claims = true").unwrap();
/// assert!(config.record_ordering_claims);
/// assert!(config.migrate_participation);
/// assert_eq!(config.default_trust, 1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Trust given to a document whose legacy row has no `source_trust`
    /// Default: 1.0
    pub default_trust: f64,

    /// Write an inferred, approved provenance record for each claim's
    /// narrative and chronological position
    /// Default: false
    pub record_ordering_claims: bool,

    /// Turn legacy claim/entity participation rows into `involved_in` edges
    /// Default: true
    pub migrate_participation: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            default_trust: 1.0,
            record_ordering_claims: false,
            migrate_participation: true,
        }
    }
}

impl MigrationConfig {
    /// Parse from TOML text and validate
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.default_trust) {
            return Err(ConfigError::Invalid {
                field: "default_trust",
                reason: format!("{} out of range [0.0, 1.0]", self.default_trust),
            });
        }
        Ok(())
    }
}
