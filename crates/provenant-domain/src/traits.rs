//! Trait definitions for storage interactions
//!
//! These traits define the boundary between the domain and persistence.
//! Implementations live in `provenant-store`.

use crate::{
    Edge, EdgeId, EdgeType, NewEdge, NewNode, NewProvenance, Node, NodeId, NodeType, Properties,
    Provenance, ProvenanceId, ReviewStatus, Target,
};
use serde::Serialize;

/// Node and edge identity and lifecycle
///
/// Implemented by the infrastructure layer (provenant-store)
pub trait GraphStore {
    /// Error type for store operations
    type Error;

    /// Create a node with a fresh identity
    fn create_node(&mut self, node: NewNode) -> Result<NodeId, Self::Error>;

    /// Create an edge; both endpoints must already exist
    fn create_edge(&mut self, edge: NewEdge) -> Result<EdgeId, Self::Error>;

    /// Get a node by ID, failing when absent
    fn get_node(&self, id: NodeId) -> Result<Node, Self::Error>;

    /// Get an edge by ID, failing when absent
    fn get_edge(&self, id: EdgeId) -> Result<Edge, Self::Error>;

    /// Replace a node's label and properties; identity and type are fixed
    fn update_node(
        &mut self,
        id: NodeId,
        label: &str,
        properties: Properties,
    ) -> Result<(), Self::Error>;

    /// Replace an edge's properties
    fn update_edge_properties(&mut self, id: EdgeId, properties: Properties)
        -> Result<(), Self::Error>;

    /// Nodes of one type, oldest first
    fn list_nodes_by_type(&self, node_type: &NodeType, limit: usize)
        -> Result<Vec<Node>, Self::Error>;

    /// Nodes with at least one provenance record from `source_id`
    fn list_nodes_by_source(&self, source_id: NodeId) -> Result<Vec<Node>, Self::Error>;

    /// Edges of one type, oldest first
    fn list_edges_by_type(&self, edge_type: &EdgeType, limit: usize)
        -> Result<Vec<Edge>, Self::Error>;

    /// Edges with at least one provenance record from `source_id`
    fn list_edges_by_source(&self, source_id: NodeId) -> Result<Vec<Edge>, Self::Error>;

    /// Edges where the node is either endpoint, oldest first
    fn list_edges_for_node(&self, node_id: NodeId) -> Result<Vec<Edge>, Self::Error>;

    /// Delete a node, its provenance, and per policy its incident edges
    fn delete_node(&mut self, id: NodeId) -> Result<(), Self::Error>;

    /// Delete an edge and its provenance
    fn delete_edge(&mut self, id: EdgeId) -> Result<(), Self::Error>;
}

/// Append-only evidence records
///
/// Implemented by the infrastructure layer (provenant-store)
pub trait ProvenanceLedger: GraphStore {
    /// Append a record for an existing node or edge
    fn create_provenance(
        &mut self,
        target: Target,
        params: NewProvenance,
    ) -> Result<ProvenanceId, Self::Error>;

    /// Get a record by ID, failing when absent
    fn get_provenance(&self, id: ProvenanceId) -> Result<Provenance, Self::Error>;

    /// All records for a target, in insertion order
    fn list_provenance_by_target(&self, target: Target) -> Result<Vec<Provenance>, Self::Error>;

    /// All records citing a source, in insertion order
    fn list_provenance_by_source(&self, source_id: NodeId)
        -> Result<Vec<Provenance>, Self::Error>;

    /// Set the review status of one record
    fn update_provenance_status(
        &mut self,
        id: ProvenanceId,
        status: ReviewStatus,
    ) -> Result<(), Self::Error>;

    /// Set the review status of every record for a target, regardless of
    /// modality; returns how many records the target has
    fn update_provenance_status_by_target(
        &mut self,
        target: Target,
        status: ReviewStatus,
    ) -> Result<usize, Self::Error>;

    /// Hard-delete one record
    fn delete_provenance(&mut self, id: ProvenanceId) -> Result<(), Self::Error>;
}

/// Creation of an element together with its first evidence record
///
/// Either both rows are written or neither is.
pub trait AtomicGraph: ProvenanceLedger {
    /// Create a node and its first provenance record in one unit
    fn create_node_with_provenance(
        &mut self,
        node: NewNode,
        provenance: NewProvenance,
    ) -> Result<(NodeId, ProvenanceId), Self::Error>;

    /// Create an edge and its first provenance record in one unit
    fn create_edge_with_provenance(
        &mut self,
        edge: NewEdge,
        provenance: NewProvenance,
    ) -> Result<(EdgeId, ProvenanceId), Self::Error>;

    /// Create a node whose first provenance record cites the node itself
    ///
    /// Used for document nodes. `provenance.source_id` is replaced with the
    /// new node's id; both writes land or neither does.
    fn create_self_sourced_node(
        &mut self,
        node: NewNode,
        provenance: NewProvenance,
    ) -> Result<(NodeId, ProvenanceId), Self::Error>;
}

/// Element counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GraphCounts {
    /// Number of nodes
    pub nodes: u64,
    /// Number of edges
    pub edges: u64,
    /// Number of provenance records
    pub provenance: u64,
}

/// A stored payload that no longer decodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorruptPayload {
    /// Element or record holding the payload
    pub owner: String,
    /// Column that failed to decode
    pub field: &'static str,
    /// Decoder message
    pub error: String,
}

/// Integrity queries used by the reconciliation sweep
///
/// Everything here is read-only. Findings are reported, never repaired.
pub trait GraphAudit: GraphStore {
    /// Nodes with zero provenance records, oldest first
    fn find_orphaned_nodes(&self, limit: usize) -> Result<Vec<Node>, Self::Error>;

    /// Edges with zero provenance records, oldest first
    fn find_orphaned_edges(&self, limit: usize) -> Result<Vec<Edge>, Self::Error>;

    /// Edges whose endpoints no longer exist
    fn find_dangling_edges(&self, limit: usize) -> Result<Vec<EdgeId>, Self::Error>;

    /// Property and location payloads that fail strict decoding
    fn find_corrupt_payloads(&self, limit: usize) -> Result<Vec<CorruptPayload>, Self::Error>;

    /// Current element counts
    fn counts(&self) -> Result<GraphCounts, Self::Error>;
}
