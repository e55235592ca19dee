//! Error types for storage operations

use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// A node, edge or provenance record does not exist
    #[error("{kind} not found: {id}")]
    NotFound {
        /// "node", "edge" or "provenance"
        kind: &'static str,
        /// The missing id
        id: String,
    },

    /// An edge refers to a node that does not exist, or a node is still referenced
    #[error("Referential error: {edge_endpoint} node {node_id} {}", referential_detail(.edge_endpoint))]
    Referential {
        /// Which endpoint ("source", "target") or "incident" for a restricted delete
        edge_endpoint: &'static str,
        /// The offending node
        node_id: String,
    },

    /// Malformed input (empty label, out-of-vocabulary value)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Database error
    #[error("Persistence error: {0}")]
    Persistence(#[from] rusqlite::Error),

    /// A property or location payload failed to encode or strictly decode
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// Configuration rejected before opening the database
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

fn referential_detail(endpoint: &str) -> &'static str {
    if endpoint == "incident" {
        "is still referenced by edges"
    } else {
        "does not exist"
    }
}

impl StoreError {
    pub(crate) fn not_found(kind: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether this is a missing-id error
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Whether this is a referential-integrity error
    pub fn is_referential(&self) -> bool {
        matches!(self, StoreError::Referential { .. })
    }
}
