//! Configuration for Janitor operations
//!
//! Defines the sweep interval and how much each sweep reports.

use provenant_store::{ConfigError, StoreConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for the Janitor service
///
/// # Examples
///
/// ```
/// use provenant_janitor::JanitorConfig;
///
/// // Default configuration (balanced)
/// let config = JanitorConfig::default();
/// assert_eq!(config.sweep_interval_minutes, 60);
///
/// // Frequent, detailed sweeps
/// let config = JanitorConfig::aggressive();
/// assert_eq!(config.sweep_interval_minutes, 15);
///
/// // Occasional, summary sweeps
/// let config = JanitorConfig::lenient();
/// assert!(!config.report_dangling_edges);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JanitorConfig {
    /// How often to run the sweep cycle (in minutes)
    /// Default: Every 60 minutes (hourly)
    pub sweep_interval_minutes: u64,

    /// Most ids reported per finding kind in one sweep
    /// Default: 100
    pub sample_limit: usize,

    /// Also look for edges whose endpoint node is gone (only possible with
    /// foreign keys disabled)
    /// Default: true
    pub report_dangling_edges: bool,

    /// Strictly decode every property and location payload
    /// Default: true
    pub scan_payloads: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval_minutes: 60,
            sample_limit: 100,
            report_dangling_edges: true,
            scan_payloads: true,
        }
    }
}

impl JanitorConfig {
    /// Frequent sweeps with large samples
    ///
    /// Suitable while a bulk migration or a new extraction pipeline is being
    /// rolled out.
    pub fn aggressive() -> Self {
        Self {
            sweep_interval_minutes: 15,
            sample_limit: 1000,
            report_dangling_edges: true,
            scan_payloads: true,
        }
    }

    /// Infrequent sweeps that only look for orphans
    pub fn lenient() -> Self {
        Self {
            sweep_interval_minutes: 360,
            sample_limit: 20,
            report_dangling_edges: false,
            scan_payloads: false,
        }
    }

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
        if self.sweep_interval_minutes == 0 {
            return Err(ConfigError::Invalid {
                field: "sweep_interval_minutes",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.sample_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "sample_limit",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes.max(1) * 60)
    }
}

/// Configuration file for the `provenant-janitor` binary
///
/// ```toml
/// [store]
/// path = "provenant.db"
///
/// [janitor]
/// sweep_interval_minutes = 30
/// sample_limit = 50
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Database to sweep
    pub store: StoreConfig,
    /// Sweep settings
    pub janitor: JanitorConfig,
}

impl ServiceConfig {
    /// Parse from TOML text and validate both sections
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file and validate both sections
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Validate both sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.store.validate()?;
        self.janitor.validate()
    }
}
