//! Migration outcome returned to the caller

use provenant_domain::NodeId;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Kind of legacy row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A chunk row
    Chunk,
    /// An entity row
    Entity,
    /// A claim row
    Claim,
    /// A relationship row
    Relationship,
    /// A claim/entity participation row
    Participation,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ItemKind::Chunk => "chunk",
            ItemKind::Entity => "entity",
            ItemKind::Claim => "claim",
            ItemKind::Relationship => "relationship",
            ItemKind::Participation => "participation",
        };
        f.write_str(name)
    }
}

/// A legacy row that was not migrated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    /// Kind of row
    pub kind: ItemKind,
    /// Legacy id (for participation rows, `claim_id/entity_id`)
    pub legacy_id: String,
    /// Why it was skipped
    pub reason: String,
}

/// Graph items written by a migration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationCounts {
    /// Document nodes (0 or 1)
    pub documents: usize,
    /// Chunk nodes
    pub chunks: usize,
    /// Entity nodes
    pub entities: usize,
    /// Claim nodes
    pub claims: usize,
    /// Relationship edges
    pub relationships: usize,
    /// Participation edges
    pub participations: usize,
    /// Provenance records of every kind
    pub provenance: usize,
}

impl MigrationCounts {
    /// Nodes written
    pub fn nodes(&self) -> usize {
        self.documents + self.chunks + self.entities + self.claims
    }

    /// Edges written
    pub fn edges(&self) -> usize {
        self.relationships + self.participations
    }
}

/// Result of migrating one legacy document
///
/// Migration is not atomic: items are written one by one and a failure on
/// one item does not undo the others. Callers decide whether a partial
/// result is acceptable by inspecting `skipped` and `errors`.
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    /// The document node every provenance record points at
    pub document_node: NodeId,
    /// What was written
    pub created: MigrationCounts,
    /// Rows that produced no graph item
    pub skipped: Vec<SkippedItem>,
    /// Secondary writes that failed without skipping their item
    pub errors: Vec<String>,
    /// Legacy id to node id, per kind, for every migrated chunk, entity
    /// and claim. Legacy tables number their rows independently.
    pub legacy_map: HashMap<ItemKind, HashMap<String, NodeId>>,
}

impl MigrationReport {
    pub(crate) fn new(document_node: NodeId) -> Self {
        Self {
            document_node,
            created: MigrationCounts {
                documents: 1,
                provenance: 1,
                ..Default::default()
            },
            skipped: Vec::new(),
            errors: Vec::new(),
            legacy_map: HashMap::new(),
        }
    }

    pub(crate) fn skip(&mut self, kind: ItemKind, legacy_id: impl Into<String>, reason: String) {
        self.skipped.push(SkippedItem {
            kind,
            legacy_id: legacy_id.into(),
            reason,
        });
    }

    /// Whether every row migrated with every write
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty() && self.errors.is_empty()
    }

    /// Skipped rows of one kind
    pub fn skipped_of(&self, kind: ItemKind) -> impl Iterator<Item = &SkippedItem> {
        self.skipped.iter().filter(move |item| item.kind == kind)
    }

    /// Node created for a legacy row
    pub fn node_for(&self, kind: ItemKind, legacy_id: &str) -> Option<NodeId> {
        self.legacy_map.get(&kind)?.get(legacy_id).copied()
    }

    pub(crate) fn map(&mut self, kind: ItemKind, legacy_id: &str, node_id: NodeId) {
        self.legacy_map
            .entry(kind)
            .or_default()
            .insert(legacy_id.to_string(), node_id);
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "{} nodes, {} edges, {} provenance, {} skipped, {} errors",
            self.created.nodes(),
            self.created.edges(),
            self.created.provenance,
            self.skipped.len(),
            self.errors.len()
        )
    }
}
