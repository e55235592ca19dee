//! Graph nodes

use crate::{NodeId, NodeType, Properties};
use serde::{Deserialize, Serialize};

/// A typed, labeled graph vertex
///
/// Identity is fixed at creation. Label and properties may be edited in place
/// by review; the evidence for the node lives in its provenance records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,

    /// Kind of node (open vocabulary)
    pub node_type: NodeType,

    /// Human-readable label
    pub label: String,

    /// Open attribute bag
    pub properties: Properties,

    /// Creation time (ms since Unix epoch)
    pub created_at: u64,

    /// Last edit time (ms since Unix epoch)
    pub updated_at: u64,
}

impl Node {
    /// Shorthand for [`Properties::get_property`]
    pub fn get_property<T: serde::de::DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.properties.get_property(key, default)
    }
}

/// Parameters for creating a node
#[derive(Debug, Clone, PartialEq)]
pub struct NewNode {
    /// Kind of node
    pub node_type: NodeType,

    /// Human-readable label
    pub label: String,

    /// Initial properties
    pub properties: Properties,
}

impl NewNode {
    /// Create node parameters with an empty property bag
    pub fn new(node_type: NodeType, label: impl Into<String>) -> Self {
        Self {
            node_type,
            label: label.into(),
            properties: Properties::new(),
        }
    }

    /// Attach properties
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }
}
