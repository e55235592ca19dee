//! Error types for migration

use thiserror::Error;

/// Errors that abort a document migration
///
/// Per-item failures are not errors; they are collected in the
/// [`crate::MigrationReport`].
#[derive(Error, Debug)]
pub enum MigrationError {
    /// The document node or its self-provenance could not be written
    #[error("Document migration failed for source {source_id}: {reason}")]
    Document {
        /// Legacy source id
        source_id: String,
        /// Underlying failure
        reason: String,
    },

    /// Legacy export could not be parsed
    #[error("JSON parse error: {0}")]
    JsonParse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Migration configuration error
#[derive(Error, Debug)]
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

impl From<serde_json::Error> for MigrationError {
    fn from(e: serde_json::Error) -> Self {
        MigrationError::JsonParse(e.to_string())
    }
}
