//! Rows of the legacy flat schema
//!
//! One [`LegacyDocument`] bundles a source row and every row that hangs off
//! it. Ids are the legacy primary keys rendered as text.

use serde::{Deserialize, Serialize};

/// A legacy source (uploaded document)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacySource {
    /// Legacy primary key
    pub id: String,
    /// Document title
    pub title: String,
    /// Uploaded file name
    #[serde(default)]
    pub filename: String,
    /// File type ("pdf", "txt")
    #[serde(default)]
    pub file_type: String,
    /// Bundled demo content
    #[serde(default)]
    pub is_demo: bool,
    /// Page count when known
    #[serde(default)]
    pub total_pages: Option<u32>,
    /// Reliability of the document in [0, 1]
    #[serde(default)]
    pub source_trust: Option<f64>,
}

/// A legacy chunk of a source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyChunk {
    /// Legacy primary key
    pub id: String,
    /// Position of the chunk in the document
    pub chunk_index: i64,
    /// Chunk text
    #[serde(default)]
    pub content: String,
    /// Position in the story sequence
    #[serde(default)]
    pub narrative_position: Option<i64>,
    /// Chapter heading
    #[serde(default)]
    pub chapter_title: Option<String>,
    /// Chapter number
    #[serde(default)]
    pub chapter_number: Option<i64>,
    /// First page of the chunk
    #[serde(default)]
    pub page_start: Option<u32>,
}

/// A legacy extracted entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyEntity {
    /// Legacy primary key
    pub id: String,
    /// Display name
    pub name: String,
    /// Entity kind ("person", "place", ...)
    pub entity_type: String,
    /// Other names
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Extraction confidence
    pub confidence: f64,
    /// Review status text
    #[serde(default = "default_review_status")]
    pub review_status: String,
}

/// A legacy claim row (event, attribute or relation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyClaim {
    /// Legacy primary key
    pub id: String,
    /// "event", "attribute" or "relation"; anything else is treated as an event
    #[serde(default)]
    pub claim_type: String,
    /// Short title
    pub title: String,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Event subtype ("action", "dialogue", ...)
    #[serde(default)]
    pub event_type: Option<String>,
    /// Date as written in the source
    #[serde(default)]
    pub date_text: Option<String>,
    /// Position in the story sequence
    #[serde(default)]
    pub narrative_position: i64,
    /// Position in the reconstructed timeline
    #[serde(default)]
    pub chronological_position: Option<i64>,
    /// Extraction confidence
    pub confidence: f64,
    /// Review status text
    #[serde(default = "default_review_status")]
    pub review_status: String,
}

/// A legacy relationship between two entities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyRelationship {
    /// Legacy primary key
    pub id: String,
    /// Source entity
    pub entity_a_id: String,
    /// Target entity
    pub entity_b_id: String,
    /// Relation kind, becomes the edge type
    pub relationship_type: String,
    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,
    /// Extraction confidence
    pub confidence: f64,
    /// Review status text
    #[serde(default = "default_review_status")]
    pub review_status: String,
}

/// A legacy participation row: an entity's role in a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyClaimEntity {
    /// Claim taking part
    pub claim_id: String,
    /// Entity taking part
    pub entity_id: String,
    /// Role of the entity ("agent", "witness", ...)
    #[serde(default)]
    pub role: Option<String>,
}

/// A source with all of its dependent rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyDocument {
    /// The source row
    pub source: LegacySource,
    /// Chunk rows
    #[serde(default)]
    pub chunks: Vec<LegacyChunk>,
    /// Entity rows
    #[serde(default)]
    pub entities: Vec<LegacyEntity>,
    /// Claim rows
    #[serde(default)]
    pub claims: Vec<LegacyClaim>,
    /// Relationship rows
    #[serde(default)]
    pub relationships: Vec<LegacyRelationship>,
    /// Participation rows
    #[serde(default)]
    pub claim_entities: Vec<LegacyClaimEntity>,
}

impl LegacyDocument {
    /// A document with no dependent rows
    pub fn new(source: LegacySource) -> Self {
        Self {
            source,
            chunks: Vec::new(),
            entities: Vec::new(),
            claims: Vec::new(),
            relationships: Vec::new(),
            claim_entities: Vec::new(),
        }
    }

    /// Parse a JSON export of one document
    pub fn from_json(json: &str) -> Result<Self, crate::MigrationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of rows that become graph items (excluding the source)
    pub fn item_count(&self) -> usize {
        self.chunks.len()
            + self.entities.len()
            + self.claims.len()
            + self.relationships.len()
            + self.claim_entities.len()
    }
}

fn default_review_status() -> String {
    "pending".to_string()
}
