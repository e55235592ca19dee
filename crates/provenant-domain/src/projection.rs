//! Read models built on strategy resolution
//!
//! The timeline and relationship-graph screens each want one row per node,
//! with the node's properties flattened and its provenance collapsed by a
//! [`ViewStrategy`]. Both projections start from the nodes a source document
//! has evidence for.

use crate::traits::ProvenanceLedger;
use crate::{
    EdgeId, EdgeType, Location, Node, NodeId, NodeType, Provenance, ProvenanceId, ReviewStatus,
    Target, ViewResolver, ViewStrategy,
};
use serde::Serialize;

/// Event type assumed when a node does not record one
pub const DEFAULT_EVENT_TYPE: &str = "action";

/// One row of the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEvent {
    /// Event node
    pub node_id: NodeId,
    /// Node label
    pub title: String,
    /// `description` property
    pub description: Option<String>,
    /// `event_type` property, [`DEFAULT_EVENT_TYPE`] when absent
    pub event_type: String,
    /// Position in reading order, 0 when unknown
    pub narrative_position: i64,
    /// Position in story-world order
    pub chronological_position: Option<i64>,
    /// Claimed time as written in the source
    pub date_text: Option<String>,
    /// Claimed start (ms since Unix epoch)
    pub date_start: Option<i64>,
    /// Claimed end (ms since Unix epoch)
    pub date_end: Option<i64>,
    /// Record the strategy selected; nil for a node without provenance
    pub provenance_id: ProvenanceId,
    /// Confidence of the selected record
    pub confidence: f64,
    /// Review status of the selected record
    pub review_status: ReviewStatus,
    /// Citation of the selected record
    pub location: Location,
    /// Entities linked to the event by `involved_in` edges
    pub participants: Vec<Participant>,
}

/// An entity taking part in a timeline event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    /// Entity node
    pub node_id: NodeId,
    /// Entity label
    pub name: String,
    /// Entity kind
    pub node_type: NodeType,
    /// `role` property of the `involved_in` edge
    pub role: Option<String>,
}

/// One entity in the relationship graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphEntity {
    /// Entity node
    pub node_id: NodeId,
    /// Node label
    pub name: String,
    /// Entity kind
    pub node_type: NodeType,
    /// `aliases` property
    pub aliases: Vec<String>,
    /// `description` property
    pub description: Option<String>,
    /// Confidence of the trust-weighted record
    pub confidence: f64,
    /// Review status of the trust-weighted record
    pub review_status: ReviewStatus,
    /// Outgoing identity claims
    pub same_as: Vec<SameAsLink>,
}

/// An asserted `same_as` edge leaving a graph entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SameAsLink {
    /// The `same_as` edge
    pub edge_id: EdgeId,
    /// Entity claimed to be the same
    pub target: NodeId,
    /// Effective confidence of the edge's trust-weighted record, 0 without provenance
    pub confidence: f64,
    /// Review status of that record
    pub review_status: ReviewStatus,
}

impl ViewResolver {
    /// Event nodes evidenced by `source_id`, ordered by narrative position
    ///
    /// Each event's provenance is collapsed with `strategy`. Claimed time is
    /// taken from the selected record when it carries any, otherwise from the
    /// latest record that does.
    pub fn timeline_events<S: ProvenanceLedger>(
        &self,
        store: &S,
        source_id: NodeId,
        strategy: ViewStrategy,
    ) -> Result<Vec<TimelineEvent>, S::Error> {
        let mut events = Vec::new();
        for node in store.list_nodes_by_source(source_id)? {
            if node.node_type != NodeType::EVENT {
                continue;
            }
            let records = store.list_provenance_by_target(Target::Node(node.id))?;
            let chosen = self.resolve(&records, strategy);
            let timed = if chosen.has_time_info() {
                Some(&chosen)
            } else {
                records.iter().rev().find(|r| r.has_time_info())
            };
            let participants = participants(store, node.id)?;

            events.push(TimelineEvent {
                node_id: node.id,
                description: text_property(&node, "description"),
                event_type: node.get_property("event_type", DEFAULT_EVENT_TYPE.to_string()),
                narrative_position: node.get_property("narrative_position", 0i64),
                chronological_position: node
                    .properties
                    .try_get("chronological_position")
                    .ok()
                    .flatten(),
                date_text: timed.and_then(|r| r.claimed_time_text.clone()),
                date_start: timed.and_then(|r| r.claimed_time_start),
                date_end: timed.and_then(|r| r.claimed_time_end),
                provenance_id: chosen.id,
                confidence: chosen.confidence,
                review_status: chosen.status,
                title: node.label,
                location: chosen.location,
                participants,
            });
        }

        events.sort_by_key(|e| e.narrative_position);
        tracing::debug!(
            parent: &self.span,
            source = %source_id,
            %strategy,
            count = events.len(),
            "timeline events"
        );
        Ok(events)
    }

    /// Entity nodes evidenced by `source_id`, with their identity claims
    ///
    /// Entity and `same_as` provenance is collapsed trust-weighted. Negated
    /// `same_as` edges are left out.
    pub fn graph_entities<S: ProvenanceLedger>(
        &self,
        store: &S,
        source_id: NodeId,
    ) -> Result<Vec<GraphEntity>, S::Error> {
        let mut entities = Vec::new();
        for node in store.list_nodes_by_source(source_id)? {
            if !node.node_type.is_entity() {
                continue;
            }
            let records = store.list_provenance_by_target(Target::Node(node.id))?;
            let chosen = self.resolve(&records, ViewStrategy::TrustWeighted);

            let mut same_as = Vec::new();
            for edge in store.list_edges_for_node(node.id)? {
                if edge.source_node != node.id || edge.edge_type != EdgeType::SAME_AS || edge.is_negated {
                    continue;
                }
                let edge_records = store.list_provenance_by_target(Target::Edge(edge.id))?;
                let support = self.select(&edge_records, ViewStrategy::TrustWeighted);
                same_as.push(SameAsLink {
                    edge_id: edge.id,
                    target: edge.target_node,
                    confidence: support.map_or(0.0, Provenance::effective_confidence),
                    review_status: support.map_or(ReviewStatus::Pending, |r| r.status),
                });
            }

            entities.push(GraphEntity {
                node_id: node.id,
                aliases: node.get_property("aliases", Vec::<String>::new()),
                description: text_property(&node, "description"),
                confidence: chosen.confidence,
                review_status: chosen.status,
                name: node.label,
                node_type: node.node_type,
                same_as,
            });
        }

        tracing::debug!(parent: &self.span, source = %source_id, count = entities.len(), "graph entities");
        Ok(entities)
    }
}

fn text_property(node: &Node, key: &str) -> Option<String> {
    node.properties.try_get::<String>(key).ok().flatten()
}

fn participants<S: ProvenanceLedger>(store: &S, event: NodeId) -> Result<Vec<Participant>, S::Error> {
    let mut found = Vec::new();
    for edge in store.list_edges_for_node(event)? {
        if edge.target_node != event || edge.edge_type != EdgeType::INVOLVED_IN || edge.is_negated {
            continue;
        }
        let entity = store.get_node(edge.source_node)?;
        found.push(Participant {
            node_id: entity.id,
            name: entity.label,
            node_type: entity.node_type,
            role: edge.properties.try_get::<String>("role").ok().flatten(),
        });
    }
    Ok(found)
}
