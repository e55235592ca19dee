//! Provenance records: append-only evidence for nodes and edges
//!
//! A record is never rewritten to "fix" a fact. Corrections are new records or
//! a review-status transition; `status` is the only field that changes after
//! creation.

use crate::{EdgeId, Location, NodeId, ProvenanceId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Clamp a score into `[0, 1]`; NaN becomes 0
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Effective confidence of a single record: `confidence * trust`, in `[0, 1]`
///
/// Inputs are clamped before multiplying, so out-of-range values written by
/// an older client cannot leak out of the unit interval.
pub fn effective_confidence(record: &Provenance) -> f64 {
    clamp_unit(record.confidence) * clamp_unit(record.trust)
}

/// Kind of item a provenance record is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// A node
    Node,
    /// An edge
    Edge,
}

impl TargetType {
    /// Storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Node => "node",
            TargetType::Edge => "edge",
        }
    }

    /// Parse from the storage name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "node" => Some(TargetType::Node),
            "edge" => Some(TargetType::Edge),
            _ => None,
        }
    }
}

impl FromStr for TargetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid target type: {}", s))
    }
}

/// The node or edge a provenance record is evidence for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "target_type", content = "target_id", rename_all = "lowercase")]
pub enum Target {
    /// Evidence about a node
    Node(NodeId),
    /// Evidence about an edge
    Edge(EdgeId),
}

impl Target {
    /// Which kind of item this is
    pub fn target_type(&self) -> TargetType {
        match self {
            Target::Node(_) => TargetType::Node,
            Target::Edge(_) => TargetType::Edge,
        }
    }

    /// The raw id value, regardless of kind
    pub fn raw_id(&self) -> u128 {
        match self {
            Target::Node(id) => id.value(),
            Target::Edge(id) => id.value(),
        }
    }

    /// Rebuild a target from its stored parts
    pub fn from_parts(target_type: TargetType, raw_id: u128) -> Self {
        match target_type {
            TargetType::Node => Target::Node(NodeId::from_value(raw_id)),
            TargetType::Edge => Target::Edge(EdgeId::from_value(raw_id)),
        }
    }
}

impl Default for Target {
    fn default() -> Self {
        Target::Node(NodeId::nil())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Node(id) => write!(f, "node:{}", id),
            Target::Edge(id) => write!(f, "edge:{}", id),
        }
    }
}

/// Logical status of a claim
///
/// Governs interpretation under aggregation: a `Denied` record is evidence
/// against the fact it targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Stated as fact
    #[default]
    Asserted,
    /// Stated as a possibility
    Hypothetical,
    /// Explicitly denied
    Denied,
    /// True under a stated condition
    Conditional,
    /// Not stated, derived from other claims
    Inferred,
    /// Required to be the case
    Obligatory,
    /// Allowed to be the case
    Permitted,
}

impl Modality {
    /// Storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Asserted => "asserted",
            Modality::Hypothetical => "hypothetical",
            Modality::Denied => "denied",
            Modality::Conditional => "conditional",
            Modality::Inferred => "inferred",
            Modality::Obligatory => "obligatory",
            Modality::Permitted => "permitted",
        }
    }

    /// Parse from the storage name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asserted" => Some(Modality::Asserted),
            "hypothetical" => Some(Modality::Hypothetical),
            "denied" => Some(Modality::Denied),
            "conditional" => Some(Modality::Conditional),
            "inferred" => Some(Modality::Inferred),
            "obligatory" => Some(Modality::Obligatory),
            "permitted" => Some(Modality::Permitted),
            _ => None,
        }
    }

    /// Whether the record is evidence against its target
    pub fn is_denial(&self) -> bool {
        matches!(self, Modality::Denied)
    }
}

impl FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid modality: {}", s))
    }
}

/// Human review status of a provenance record
///
/// Lifecycle: `pending -> {approved | rejected | edited}`. Reviewers may
/// revisit a decision; the last write wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    /// Awaiting review
    #[default]
    Pending,
    /// Accepted by a reviewer
    Approved,
    /// Rejected by a reviewer
    Rejected,
    /// The underlying node or edge content was modified by a reviewer
    Edited,
}

impl ReviewStatus {
    /// All statuses in lifecycle order
    pub const ALL: [ReviewStatus; 4] = [
        ReviewStatus::Pending,
        ReviewStatus::Approved,
        ReviewStatus::Rejected,
        ReviewStatus::Edited,
    ];

    /// Storage name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
            ReviewStatus::Edited => "edited",
        }
    }

    /// Parse from the storage name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(ReviewStatus::Pending),
            "approved" => Some(ReviewStatus::Approved),
            "rejected" => Some(ReviewStatus::Rejected),
            "edited" => Some(ReviewStatus::Edited),
            _ => None,
        }
    }

    /// Whether a reviewer has acted on the record
    pub fn is_reviewed(&self) -> bool {
        !matches!(self, ReviewStatus::Pending)
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid review status: {}", s))
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable evidence record about a node or edge
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Provenance {
    /// Unique identifier
    pub id: ProvenanceId,

    /// The node or edge this record is evidence for
    #[serde(flatten)]
    pub target: Target,

    /// Node the evidence comes from, typically a document node
    pub source_id: NodeId,

    /// Supporting text from the source
    pub excerpt: String,

    /// Citation into the source
    pub location: Location,

    /// Confidence of this particular claim [0, 1]
    pub confidence: f64,

    /// Reliability of the source [0, 1]
    pub trust: f64,

    /// Logical status of the claim
    pub modality: Modality,

    /// Review status
    pub status: ReviewStatus,

    /// Start of the claimed time range (seconds since Unix epoch)
    pub claimed_time_start: Option<i64>,

    /// End of the claimed time range (seconds since Unix epoch)
    pub claimed_time_end: Option<i64>,

    /// Time as written in the source ("the following spring")
    pub claimed_time_text: Option<String>,

    /// Claimed geographic region (normalized)
    pub claimed_geo_region: Option<String>,

    /// Place as written in the source
    pub claimed_geo_text: Option<String>,

    /// Who made the claim, e.g. a reviewer node
    pub claimed_by: Option<NodeId>,

    /// When the record was appended (ms since Unix epoch)
    pub created_at: u64,
}

impl Provenance {
    /// `confidence * trust`, see [`effective_confidence`]
    pub fn effective_confidence(&self) -> f64 {
        effective_confidence(self)
    }

    /// Whether a reviewer approved this record
    pub fn is_approved(&self) -> bool {
        self.status == ReviewStatus::Approved
    }

    /// Whether this record still awaits review
    pub fn is_pending(&self) -> bool {
        self.status == ReviewStatus::Pending
    }

    /// Whether a reviewer rejected this record
    pub fn is_rejected(&self) -> bool {
        self.status == ReviewStatus::Rejected
    }

    /// Whether any temporal scope is claimed
    pub fn has_time_info(&self) -> bool {
        self.claimed_time_start.is_some()
            || self.claimed_time_end.is_some()
            || self.claimed_time_text.is_some()
    }

    /// Whether any spatial scope is claimed
    pub fn has_geo_info(&self) -> bool {
        self.claimed_geo_region.is_some() || self.claimed_geo_text.is_some()
    }

    /// The claimed time range, if either end is set
    pub fn time_range(&self) -> Option<(Option<i64>, Option<i64>)> {
        if self.claimed_time_start.is_some() || self.claimed_time_end.is_some() {
            Some((self.claimed_time_start, self.claimed_time_end))
        } else {
            None
        }
    }
}

/// Parameters for appending a provenance record
///
/// The target is supplied separately so the same parameters can be bound to a
/// node or edge that is created in the same transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProvenance {
    /// Node the evidence comes from
    pub source_id: NodeId,

    /// Supporting text
    pub excerpt: String,

    /// Citation into the source
    pub location: Location,

    /// Claim confidence, clamped to [0, 1] on write
    pub confidence: f64,

    /// Source trust, clamped to [0, 1] on write
    pub trust: f64,

    /// Logical status of the claim
    pub modality: Modality,

    /// Initial review status (`Pending` unless the caller asserts otherwise)
    pub status: ReviewStatus,

    /// Start of the claimed time range
    pub claimed_time_start: Option<i64>,

    /// End of the claimed time range
    pub claimed_time_end: Option<i64>,

    /// Time as written in the source
    pub claimed_time_text: Option<String>,

    /// Claimed geographic region
    pub claimed_geo_region: Option<String>,

    /// Place as written in the source
    pub claimed_geo_text: Option<String>,

    /// Who made the claim
    pub claimed_by: Option<NodeId>,
}

impl NewProvenance {
    /// Asserted, pending evidence from `source_id` with full confidence and trust
    pub fn new(source_id: NodeId) -> Self {
        Self {
            source_id,
            excerpt: String::new(),
            location: Location::default(),
            confidence: 1.0,
            trust: 1.0,
            modality: Modality::Asserted,
            status: ReviewStatus::Pending,
            claimed_time_start: None,
            claimed_time_end: None,
            claimed_time_text: None,
            claimed_geo_region: None,
            claimed_geo_text: None,
            claimed_by: None,
        }
    }

    /// Set the excerpt
    pub fn excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = excerpt.into();
        self
    }

    /// Set the location
    pub fn location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }

    /// Set the claim confidence
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Set the source trust
    pub fn trust(mut self, trust: f64) -> Self {
        self.trust = trust;
        self
    }

    /// Set the modality
    pub fn modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    /// Set the initial review status
    pub fn status(mut self, status: ReviewStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the claimed time range
    pub fn claimed_time(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.claimed_time_start = start;
        self.claimed_time_end = end;
        self
    }

    /// Set the time as written in the source
    pub fn claimed_time_text(mut self, text: impl Into<String>) -> Self {
        self.claimed_time_text = Some(text.into());
        self
    }

    /// Set the claimed region and its source wording
    pub fn claimed_geo(mut self, region: Option<String>, text: Option<String>) -> Self {
        self.claimed_geo_region = region;
        self.claimed_geo_text = text;
        self
    }

    /// Set who made the claim
    pub fn claimed_by(mut self, by: NodeId) -> Self {
        self.claimed_by = Some(by);
        self
    }

    /// Materialize the record as it will be stored
    ///
    /// Scores are clamped here so every write path shares the same rule.
    pub fn into_record(self, id: ProvenanceId, target: Target, created_at: u64) -> Provenance {
        Provenance {
            id,
            target,
            source_id: self.source_id,
            excerpt: self.excerpt,
            location: self.location,
            confidence: clamp_unit(self.confidence),
            trust: clamp_unit(self.trust),
            modality: self.modality,
            status: self.status,
            claimed_time_start: self.claimed_time_start,
            claimed_time_end: self.claimed_time_end,
            claimed_time_text: self.claimed_time_text,
            claimed_geo_region: self.claimed_geo_region,
            claimed_geo_text: self.claimed_geo_text,
            claimed_by: self.claimed_by,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(confidence: f64, trust: f64) -> Provenance {
        NewProvenance::new(NodeId::new())
            .confidence(confidence)
            .trust(trust)
            .into_record(ProvenanceId::new(), Target::Node(NodeId::new()), 0)
    }

    #[test]
    fn test_effective_confidence_is_product() {
        let r = record(0.9, 0.5);
        assert!((r.effective_confidence() - 0.45).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let r = record(1.7, -0.2);
        assert_eq!(r.confidence, 1.0);
        assert_eq!(r.trust, 0.0);

        let raw = Provenance {
            confidence: 3.0,
            trust: f64::NAN,
            ..Default::default()
        };
        assert_eq!(effective_confidence(&raw), 0.0);
    }

    #[test]
    fn test_zero_value_record() {
        let zero = Provenance::default();
        assert!(zero.id.is_nil());
        assert_eq!(zero.target, Target::Node(NodeId::nil()));
        assert_eq!(zero.status, ReviewStatus::Pending);
        assert_eq!(zero.modality, Modality::Asserted);
        assert_eq!(zero.effective_confidence(), 0.0);
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("Approved".parse::<ReviewStatus>().unwrap(), ReviewStatus::Approved);
        assert!("accepted".parse::<ReviewStatus>().is_err());
        for status in ReviewStatus::ALL {
            assert_eq!(ReviewStatus::parse(status.as_str()), Some(status));
        }
        assert!(!ReviewStatus::Pending.is_reviewed());
        assert!(ReviewStatus::Edited.is_reviewed());
    }

    #[test]
    fn test_modality_parse() {
        assert_eq!(Modality::parse("DENIED"), Some(Modality::Denied));
        assert!(Modality::Denied.is_denial());
        assert!(!Modality::Hypothetical.is_denial());
        assert!("maybe".parse::<Modality>().is_err());
    }

    #[test]
    fn test_target_parts() {
        let edge = EdgeId::new();
        let target = Target::Edge(edge);
        assert_eq!(target.target_type(), TargetType::Edge);
        assert_eq!(Target::from_parts(TargetType::Edge, target.raw_id()), target);
    }

    #[test]
    fn test_time_and_geo_info() {
        let mut r = record(1.0, 1.0);
        assert!(!r.has_time_info());
        assert!(r.time_range().is_none());
        r.claimed_time_text = Some("that winter".to_string());
        assert!(r.has_time_info());
        assert!(r.time_range().is_none());
        r.claimed_time_start = Some(-5_000_000);
        assert_eq!(r.time_range(), Some((Some(-5_000_000), None)));
        r.claimed_geo_text = Some("Derbyshire".to_string());
        assert!(r.has_geo_info());
    }

    #[test]
    fn test_serialized_shape() {
        let r = record(0.5, 0.5);
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["target_type"], "node");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["modality"], "asserted");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Effective confidence equals the product and stays in [0, 1]
        #[test]
        fn test_effective_confidence_range(c in 0.0f64..=1.0, t in 0.0f64..=1.0) {
            let r = Provenance { confidence: c, trust: t, ..Default::default() };
            let eff = effective_confidence(&r);
            prop_assert!((eff - c * t).abs() < 1e-12);
            prop_assert!((0.0..=1.0).contains(&eff));
        }

        /// Arbitrary inputs never escape the unit interval
        #[test]
        fn test_effective_confidence_clamped(c in any::<f64>(), t in any::<f64>()) {
            let r = Provenance { confidence: c, trust: t, ..Default::default() };
            let eff = effective_confidence(&r);
            prop_assert!((0.0..=1.0).contains(&eff));
        }
    }
}
