//! Core Migrator implementation

use crate::config::MigrationConfig;
use crate::error::MigrationError;
use crate::legacy::{
    LegacyChunk, LegacyClaim, LegacyClaimEntity, LegacyDocument, LegacyEntity,
    LegacyRelationship, LegacySource,
};
use crate::report::{ItemKind, MigrationReport};
use provenant_domain::traits::AtomicGraph;
use provenant_domain::{
    EdgeType, Location, Modality, NewEdge, NewNode, NewProvenance, NodeId, NodeType,
    PositionKind, Properties, ReviewStatus, Target,
};
use std::fmt::Display;
use tracing::Span;

/// Converts legacy flat-schema documents into graph form
///
/// Every node and edge the Migrator writes gets one provenance record whose
/// source is the migrated document's node, written in the same transaction
/// as the item itself. Items are independent of each other: a failed chunk,
/// entity, claim or relationship is recorded in the [`MigrationReport`] and
/// the batch moves on. A document migration is therefore **not atomic**.
pub struct Migrator<S>
where
    S: AtomicGraph,
{
    store: S,
    config: MigrationConfig,
    span: Span,
}

impl<S> Migrator<S>
where
    S: AtomicGraph,
    S::Error: Display,
{
    /// Create a Migrator writing into `store`
    pub fn new(store: S, config: MigrationConfig) -> Result<Self, MigrationError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            span: Span::none(),
        })
    }

    /// Emit events under the given span
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the underlying store
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Give back the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// The active configuration
    pub fn config(&self) -> &MigrationConfig {
        &self.config
    }

    /// Migrate one legacy document and all of its rows
    ///
    /// Fails only when the document node cannot be written. Everything else
    /// is reported per item.
    pub fn migrate_document(
        &mut self,
        doc: &LegacyDocument,
    ) -> Result<MigrationReport, MigrationError> {
        let span = self.span.clone();
        let _entered = span.enter();
        tracing::info!(
            source_id = %doc.source.id,
            title = %doc.source.title,
            items = doc.item_count(),
            "migrating legacy document"
        );

        let document_node = self.migrate_source(&doc.source)?;
        let mut report = MigrationReport::new(document_node);

        for chunk in &doc.chunks {
            self.migrate_chunk(document_node, chunk, &mut report);
        }
        for entity in &doc.entities {
            self.migrate_entity(document_node, entity, &mut report);
        }
        for claim in &doc.claims {
            self.migrate_claim(document_node, claim, &mut report);
        }
        for relationship in &doc.relationships {
            self.migrate_relationship(document_node, relationship, &mut report);
        }
        if self.config.migrate_participation {
            for row in &doc.claim_entities {
                self.migrate_participation(document_node, row, &mut report);
            }
        }

        if report.is_complete() {
            tracing::info!(source_id = %doc.source.id, summary = %report.summary(), "migration complete");
        } else {
            tracing::warn!(source_id = %doc.source.id, summary = %report.summary(), "migration finished with gaps");
        }
        Ok(report)
    }

    fn migrate_source(&mut self, source: &LegacySource) -> Result<NodeId, MigrationError> {
        let fail = |reason: String| MigrationError::Document {
            source_id: source.id.clone(),
            reason,
        };

        let label = document_label(source);
        let mut properties = Properties::new()
            .with("filename", source.filename.as_str())
            .with("file_type", source.file_type.as_str())
            .with("is_demo", source.is_demo)
            .with("source_id", source.id.as_str());
        if let Some(pages) = source.total_pages {
            properties = properties.with("total_pages", pages);
        }

        // The document is its own evidence
        let trust = source.source_trust.unwrap_or(self.config.default_trust);
        let node = NewNode::new(NodeType::DOCUMENT, label.clone()).with_properties(properties);
        let provenance = NewProvenance::new(NodeId::nil())
            .excerpt(format!("Document: {label}"))
            .confidence(1.0)
            .trust(trust)
            .status(ReviewStatus::Approved);

        let (node_id, _) = self
            .store
            .create_self_sourced_node(node, provenance)
            .map_err(|e| fail(e.to_string()))?;

        tracing::debug!(%node_id, source_id = %source.id, "document node created");
        Ok(node_id)
    }

    fn migrate_chunk(&mut self, document: NodeId, chunk: &LegacyChunk, report: &mut MigrationReport) {
        let mut properties = Properties::new().with("chunk_index", chunk.chunk_index);
        if let Some(position) = chunk.narrative_position {
            properties = properties.with("narrative_position", position);
        }
        if let Some(title) = &chunk.chapter_title {
            properties = properties.with("chapter_title", title.as_str());
        }
        if let Some(number) = chunk.chapter_number {
            properties = properties.with("chapter_number", number);
        }

        let mut location = Location {
            page: chunk.page_start,
            ..Default::default()
        };
        if let Some(title) = &chunk.chapter_title {
            location = location.with_chapter(title.as_str());
        }

        let node = NewNode::new(NodeType::CHUNK, format!("Chunk {}", chunk.chunk_index))
            .with_properties(properties);
        let provenance = NewProvenance::new(document)
            .excerpt(chunk.content.as_str())
            .location(location)
            .confidence(1.0)
            .trust(1.0)
            .status(ReviewStatus::Approved);

        match self.store.create_node_with_provenance(node, provenance) {
            Ok((node_id, _)) => {
                report.created.chunks += 1;
                report.created.provenance += 1;
                report.map(ItemKind::Chunk, &chunk.id, node_id);
            }
            Err(e) => {
                tracing::warn!(legacy_id = %chunk.id, error = %e, "skipping chunk");
                report.skip(ItemKind::Chunk, chunk.id.as_str(), e.to_string());
            }
        }
    }

    fn migrate_entity(
        &mut self,
        document: NodeId,
        entity: &LegacyEntity,
        report: &mut MigrationReport,
    ) {
        let node_type = match NodeType::new(&entity.entity_type) {
            Ok(node_type) => node_type,
            Err(reason) => {
                tracing::warn!(legacy_id = %entity.id, %reason, "skipping entity");
                report.skip(ItemKind::Entity, entity.id.as_str(), reason);
                return;
            }
        };

        let mut properties = Properties::new()
            .with("entity_type", entity.entity_type.as_str())
            .with("aliases", entity.aliases.clone());
        if let Some(description) = &entity.description {
            properties = properties.with("description", description.as_str());
        }

        let node = NewNode::new(node_type, entity.name.as_str()).with_properties(properties);
        let mut provenance = NewProvenance::new(document)
            .confidence(entity.confidence)
            .status(legacy_status(&entity.id, &entity.review_status));
        if let Some(description) = &entity.description {
            provenance = provenance.excerpt(description.as_str());
        }

        match self.store.create_node_with_provenance(node, provenance) {
            Ok((node_id, _)) => {
                report.created.entities += 1;
                report.created.provenance += 1;
                report.map(ItemKind::Entity, &entity.id, node_id);
            }
            Err(e) => {
                tracing::warn!(legacy_id = %entity.id, error = %e, "skipping entity");
                report.skip(ItemKind::Entity, entity.id.as_str(), e.to_string());
            }
        }
    }

    fn migrate_claim(&mut self, document: NodeId, claim: &LegacyClaim, report: &mut MigrationReport) {
        let mut properties = Properties::new().with("narrative_position", claim.narrative_position);
        if let Some(event_type) = &claim.event_type {
            properties = properties.with("event_type", event_type.as_str());
        }
        if let Some(description) = &claim.description {
            properties = properties.with("description", description.as_str());
        }
        if let Some(position) = claim.chronological_position {
            properties = properties.with("chronological_position", position);
        }

        let node = NewNode::new(claim_node_type(&claim.claim_type), claim.title.as_str())
            .with_properties(properties);
        let mut provenance = NewProvenance::new(document)
            .confidence(claim.confidence)
            .status(legacy_status(&claim.id, &claim.review_status));
        if let Some(description) = &claim.description {
            provenance = provenance.excerpt(description.as_str());
        }
        if let Some(date_text) = &claim.date_text {
            provenance = provenance.claimed_time_text(date_text.as_str());
        }

        let node_id = match self.store.create_node_with_provenance(node, provenance) {
            Ok((node_id, _)) => node_id,
            Err(e) => {
                tracing::warn!(legacy_id = %claim.id, error = %e, "skipping claim");
                report.skip(ItemKind::Claim, claim.id.as_str(), e.to_string());
                return;
            }
        };
        report.created.claims += 1;
        report.created.provenance += 1;
        report.map(ItemKind::Claim, &claim.id, node_id);

        if self.config.record_ordering_claims {
            self.record_ordering(document, node_id, PositionKind::Narrative, claim.narrative_position, report);
            if let Some(position) = claim.chronological_position {
                self.record_ordering(document, node_id, PositionKind::Chronological, position, report);
            }
        }
    }

    fn record_ordering(
        &mut self,
        document: NodeId,
        claim: NodeId,
        kind: PositionKind,
        position: i64,
        report: &mut MigrationReport,
    ) {
        let excerpt = match kind {
            PositionKind::Narrative => format!("Narrative position: {position}"),
            PositionKind::Chronological => format!("Chronological position: {position}"),
        };
        let provenance = NewProvenance::new(document)
            .excerpt(excerpt)
            .location(Location::ordering(kind, position))
            .modality(Modality::Inferred)
            .status(ReviewStatus::Approved);

        match self.store.create_provenance(Target::Node(claim), provenance) {
            Ok(_) => report.created.provenance += 1,
            Err(e) => {
                tracing::warn!(%claim, ?kind, error = %e, "failed to record ordering provenance");
                report
                    .errors
                    .push(format!("ordering provenance for claim {claim}: {e}"));
            }
        }
    }

    fn migrate_relationship(
        &mut self,
        document: NodeId,
        relationship: &LegacyRelationship,
        report: &mut MigrationReport,
    ) {
        let endpoints = (
            report.node_for(ItemKind::Entity, &relationship.entity_a_id),
            report.node_for(ItemKind::Entity, &relationship.entity_b_id),
        );
        let (source, target) = match endpoints {
            (Some(source), Some(target)) => (source, target),
            (source, _) => {
                let missing = if source.is_none() {
                    &relationship.entity_a_id
                } else {
                    &relationship.entity_b_id
                };
                let reason = format!("entity {missing} was not migrated");
                tracing::warn!(legacy_id = %relationship.id, %reason, "skipping relationship");
                report.skip(ItemKind::Relationship, relationship.id.as_str(), reason);
                return;
            }
        };

        let edge_type = match EdgeType::new(&relationship.relationship_type) {
            Ok(edge_type) => edge_type,
            Err(reason) => {
                tracing::warn!(legacy_id = %relationship.id, %reason, "skipping relationship");
                report.skip(ItemKind::Relationship, relationship.id.as_str(), reason);
                return;
            }
        };

        let mut properties = Properties::new();
        if let Some(description) = &relationship.description {
            properties = properties.with("description", description.as_str());
        }
        let edge = NewEdge::new(edge_type, source, target).with_properties(properties);
        let mut provenance = NewProvenance::new(document)
            .confidence(relationship.confidence)
            .status(legacy_status(&relationship.id, &relationship.review_status));
        if let Some(description) = &relationship.description {
            provenance = provenance.excerpt(description.as_str());
        }

        match self.store.create_edge_with_provenance(edge, provenance) {
            Ok(_) => {
                report.created.relationships += 1;
                report.created.provenance += 1;
            }
            Err(e) => {
                tracing::warn!(legacy_id = %relationship.id, error = %e, "skipping relationship");
                report.skip(ItemKind::Relationship, relationship.id.as_str(), e.to_string());
            }
        }
    }

    fn migrate_participation(
        &mut self,
        document: NodeId,
        row: &LegacyClaimEntity,
        report: &mut MigrationReport,
    ) {
        let legacy_id = format!("{}/{}", row.claim_id, row.entity_id);
        let claim = report.node_for(ItemKind::Claim, &row.claim_id);
        let entity = report.node_for(ItemKind::Entity, &row.entity_id);
        let (Some(claim), Some(entity)) = (claim, entity) else {
            let reason = "claim or entity was not migrated".to_string();
            tracing::warn!(%legacy_id, %reason, "skipping participation");
            report.skip(ItemKind::Participation, legacy_id, reason);
            return;
        };

        let mut properties = Properties::new();
        if let Some(role) = &row.role {
            properties = properties.with("role", role.as_str());
        }
        let edge = NewEdge::new(EdgeType::INVOLVED_IN, entity, claim).with_properties(properties);
        let provenance = NewProvenance::new(document).status(ReviewStatus::Approved);

        match self.store.create_edge_with_provenance(edge, provenance) {
            Ok(_) => {
                report.created.participations += 1;
                report.created.provenance += 1;
            }
            Err(e) => {
                tracing::warn!(%legacy_id, error = %e, "skipping participation");
                report.skip(ItemKind::Participation, legacy_id, e.to_string());
            }
        }
    }
}

/// Label for a document node: title, then file name, then legacy id
fn document_label(source: &LegacySource) -> String {
    [&source.title, &source.filename]
        .into_iter()
        .map(|s| s.trim())
        .find(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Document {}", source.id))
}

/// Node type for a legacy claim row; unknown kinds become events
pub(crate) fn claim_node_type(claim_type: &str) -> NodeType {
    match claim_type.trim().to_lowercase().as_str() {
        "attribute" => NodeType::ATTRIBUTE,
        "relation" => NodeType::RELATION,
        _ => NodeType::EVENT,
    }
}

/// Parse a legacy review status, falling back to pending
fn legacy_status(legacy_id: &str, raw: &str) -> ReviewStatus {
    ReviewStatus::parse(raw).unwrap_or_else(|| {
        tracing::warn!(%legacy_id, status = %raw, "unknown legacy review status, using pending");
        ReviewStatus::Pending
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_node_type() {
        assert_eq!(claim_node_type("event"), NodeType::EVENT);
        assert_eq!(claim_node_type("Attribute"), NodeType::ATTRIBUTE);
        assert_eq!(claim_node_type("relation"), NodeType::RELATION);
        assert_eq!(claim_node_type(""), NodeType::EVENT);
        assert_eq!(claim_node_type("rumour"), NodeType::EVENT);
    }

    #[test]
    fn test_legacy_status_fallback() {
        assert_eq!(legacy_status("e-1", "approved"), ReviewStatus::Approved);
        assert_eq!(legacy_status("e-1", "EDITED"), ReviewStatus::Edited);
        assert_eq!(legacy_status("e-1", "needs_review"), ReviewStatus::Pending);
    }

    #[test]
    fn test_document_label_fallbacks() {
        let mut source = LegacySource {
            id: "s-9".to_string(),
            title: "Mansfield Park".to_string(),
            filename: "mansfield.pdf".to_string(),
            file_type: "pdf".to_string(),
            is_demo: false,
            total_pages: None,
            source_trust: None,
        };
        assert_eq!(document_label(&source), "Mansfield Park");
        source.title = "  ".to_string();
        assert_eq!(document_label(&source), "mansfield.pdf");
        source.filename.clear();
        assert_eq!(document_label(&source), "Document s-9");
    }
}
