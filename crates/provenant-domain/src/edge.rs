//! Graph edges

use crate::{EdgeId, EdgeType, NodeId, Properties};
use serde::{Deserialize, Serialize};

/// A typed, directed relation between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier
    pub id: EdgeId,

    /// Kind of relation (open vocabulary)
    pub edge_type: EdgeType,

    /// Node the edge starts at
    pub source_node: NodeId,

    /// Node the edge points to
    pub target_node: NodeId,

    /// Open attribute bag
    pub properties: Properties,

    /// The edge records an explicit denial ("X is not related to Y")
    pub is_negated: bool,

    /// Creation time (ms since Unix epoch)
    pub created_at: u64,
}

impl Edge {
    /// Shorthand for [`Properties::get_property`]
    pub fn get_property<T: serde::de::DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.properties.get_property(key, default)
    }

    /// Whether the node is either endpoint
    pub fn touches(&self, node: NodeId) -> bool {
        self.source_node == node || self.target_node == node
    }
}

/// Parameters for creating an edge
#[derive(Debug, Clone, PartialEq)]
pub struct NewEdge {
    /// Kind of relation
    pub edge_type: EdgeType,

    /// Node the edge starts at (must exist)
    pub source_node: NodeId,

    /// Node the edge points to (must exist)
    pub target_node: NodeId,

    /// Initial properties
    pub properties: Properties,

    /// Explicit denial of the relation
    pub is_negated: bool,
}

impl NewEdge {
    /// Create edge parameters for an asserted relation
    pub fn new(edge_type: EdgeType, source_node: NodeId, target_node: NodeId) -> Self {
        Self {
            edge_type,
            source_node,
            target_node,
            properties: Properties::new(),
            is_negated: false,
        }
    }

    /// Attach properties
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Mark the relation as explicitly denied
    pub fn negated(mut self) -> Self {
        self.is_negated = true;
        self
    }
}
