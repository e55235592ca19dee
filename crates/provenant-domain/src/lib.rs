//! Provenant Domain Layer
//!
//! Core value types and trait interfaces for a provenance-qualified knowledge
//! graph. Every assertion about a node or edge is backed by one or more
//! independent provenance records; reads collapse those records into a single
//! view with a caller-chosen strategy.
//!
//! ## Key Concepts
//!
//! - **Node / Edge**: typed graph elements with open-ended property bags
//! - **Provenance**: append-only evidence for a node or edge, carrying source,
//!   confidence, trust, modality and optional temporal/spatial scope
//! - **Effective confidence**: `confidence * trust`, derived at read time
//! - **View strategy**: how conflicting provenance is resolved into one record
//! - **Identity**: `same_as` edges linking entity nodes that denote one referent
//!
//! ## Architecture
//!
//! This crate holds no storage code. Persistence lives in `provenant-store`
//! behind the [`traits::GraphStore`], [`traits::ProvenanceLedger`] and
//! [`traits::AtomicGraph`] traits.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod edge;
pub mod id;
pub mod identity;
pub mod location;
pub mod node;
pub mod projection;
pub mod properties;
pub mod provenance;
pub mod review;
pub mod traits;
pub mod view;
pub mod vocabulary;

// Re-exports for convenience
pub use edge::{Edge, NewEdge};
pub use id::{EdgeId, NodeId, ProvenanceId};
pub use identity::IdentityClasses;
pub use location::{Location, PositionKind};
pub use node::{NewNode, Node};
pub use projection::{GraphEntity, Participant, SameAsLink, TimelineEvent};
pub use properties::Properties;
pub use provenance::{
    clamp_unit, effective_confidence, Modality, NewProvenance, Provenance, ReviewStatus, Target,
    TargetType,
};
pub use review::{ReviewCounts, ReviewProgress};
pub use view::{ClaimNormalizer, ViewResolver, ViewStrategy};
pub use vocabulary::{EdgeType, NodeType};

/// Current time in milliseconds since the Unix epoch.
///
/// Falls back to 0 if the system clock reports a time before the epoch.
pub fn current_timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
