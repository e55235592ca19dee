//! Query-time resolution of conflicting provenance
//!
//! A target may carry any number of provenance records that agree, disagree or
//! deny each other. A [`ViewStrategy`] collapses that set into the one record a
//! reader renders. Records are considered in the order the ledger returns them
//! (insertion order), which is what "first seen" means for tie breaking.

use crate::traits::{GraphStore, ProvenanceLedger};
use crate::{effective_confidence, EdgeType, IdentityClasses, NodeId, Provenance, Target};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

/// How to pick the representative record from a provenance set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStrategy {
    /// First record by insertion order
    SingleSource,
    /// Highest effective confidence, ties to the first seen
    #[default]
    TrustWeighted,
    /// Most supported claim; needs a [`ClaimNormalizer`]
    ///
    /// When no claim key has a supporting record, the best non-denied record
    /// is shown. A denial is returned only when every record is one.
    Majority,
    /// First approved record, else trust-weighted
    HumanDecided,
    /// Lowest effective confidence, for surfacing disagreement
    Conflict,
}

impl ViewStrategy {
    /// Every strategy
    pub const ALL: [ViewStrategy; 5] = [
        ViewStrategy::SingleSource,
        ViewStrategy::TrustWeighted,
        ViewStrategy::Majority,
        ViewStrategy::HumanDecided,
        ViewStrategy::Conflict,
    ];

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewStrategy::SingleSource => "single_source",
            ViewStrategy::TrustWeighted => "trust_weighted",
            ViewStrategy::Majority => "majority",
            ViewStrategy::HumanDecided => "human_decided",
            ViewStrategy::Conflict => "conflict",
        }
    }

    /// Parse the wire name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|strategy| strategy.as_str() == s.trim())
    }
}

impl FromStr for ViewStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid view strategy: {}", s))
    }
}

impl fmt::Display for ViewStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides which provenance records assert the same fact
///
/// Records mapping to the same key vote together under
/// [`ViewStrategy::Majority`]. `None` keeps a record out of the vote. There is
/// no built-in rule: what counts as "the same claim" is domain input.
pub trait ClaimNormalizer {
    /// Normalized claim key for a record
    fn claim_key(&self, record: &Provenance) -> Option<String>;
}

impl<F> ClaimNormalizer for F
where
    F: Fn(&Provenance) -> Option<String>,
{
    fn claim_key(&self, record: &Provenance) -> Option<String> {
        self(record)
    }
}

/// Collapses provenance sets into a single view
///
/// # Examples
///
/// ```
/// use provenant_domain::{NewProvenance, NodeId, ProvenanceId, Target, ViewResolver, ViewStrategy};
///
/// let source = NodeId::new();
/// let target = Target::Node(NodeId::new());
/// let records = vec![
///     NewProvenance::new(source).confidence(0.9).trust(0.5)
///         .into_record(ProvenanceId::new(), target, 0),
///     NewProvenance::new(source).confidence(0.6).trust(1.0)
///         .into_record(ProvenanceId::new(), target, 0),
/// ];
///
/// let resolver = ViewResolver::new();
/// let chosen = resolver.resolve(&records, ViewStrategy::TrustWeighted);
/// assert_eq!(chosen.id, records[1].id);
/// ```
pub struct ViewResolver {
    normalizer: Option<Box<dyn ClaimNormalizer + Send + Sync>>,
    pub(crate) span: tracing::Span,
}

impl fmt::Debug for ViewResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewResolver")
            .field("normalizer", &self.normalizer.is_some())
            .finish()
    }
}

impl Default for ViewResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewResolver {
    /// Resolver without a claim normalizer
    pub fn new() -> Self {
        Self {
            normalizer: None,
            span: tracing::Span::none(),
        }
    }

    /// Enable true majority voting
    pub fn with_normalizer<N>(mut self, normalizer: N) -> Self
    where
        N: ClaimNormalizer + Send + Sync + 'static,
    {
        self.normalizer = Some(Box::new(normalizer));
        self
    }

    /// Emit events under the given span
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// Whether majority voting is available
    pub fn has_normalizer(&self) -> bool {
        self.normalizer.is_some()
    }

    /// Pick the representative record, or `None` for an empty set
    pub fn select<'a>(
        &self,
        records: &'a [Provenance],
        strategy: ViewStrategy,
    ) -> Option<&'a Provenance> {
        self.select_index(records, strategy).map(|i| &records[i])
    }

    /// Pick the representative record
    ///
    /// An empty set (an orphaned target) yields `Provenance::default()`:
    /// nil ids, zero confidence and trust, pending.
    pub fn resolve(&self, records: &[Provenance], strategy: ViewStrategy) -> Provenance {
        self.select(records, strategy).cloned().unwrap_or_default()
    }

    fn select_index(&self, records: &[Provenance], strategy: ViewStrategy) -> Option<usize> {
        if records.is_empty() {
            return None;
        }
        match strategy {
            ViewStrategy::SingleSource => Some(0),
            ViewStrategy::TrustWeighted => argmax(records),
            ViewStrategy::Conflict => argmin(records),
            ViewStrategy::HumanDecided => records
                .iter()
                .position(Provenance::is_approved)
                .or_else(|| argmax(records)),
            ViewStrategy::Majority => match &self.normalizer {
                Some(normalizer) => majority(records, normalizer.as_ref())
                    .or_else(|| argmax_supporting(records))
                    .or_else(|| argmax(records)),
                None => {
                    tracing::debug!(
                        parent: &self.span,
                        records = records.len(),
                        "no claim normalizer configured, majority resolves as trust_weighted"
                    );
                    argmax(records)
                }
            },
        }
    }

    /// Canonical id for an entity by following one outgoing `same_as` hop
    ///
    /// Negated `same_as` edges are ignored. With no candidate the entity is its
    /// own canonical id. With several, each candidate edge is represented by
    /// the record `strategy` selects from its provenance, and the same strategy
    /// picks among those representatives. Candidates without provenance are
    /// only chosen when none has any. `SingleSource` takes the first edge
    /// by insertion order. Chains are not followed; see
    /// [`ViewResolver::canonical`] for transitive resolution.
    pub fn resolve_identity<S: ProvenanceLedger>(
        &self,
        store: &S,
        entity: NodeId,
        strategy: ViewStrategy,
    ) -> Result<NodeId, S::Error> {
        let candidates: Vec<_> = store
            .list_edges_for_node(entity)?
            .into_iter()
            .filter(|e| {
                e.source_node == entity && e.edge_type == EdgeType::SAME_AS && !e.is_negated
            })
            .collect();

        if candidates.len() <= 1 || strategy == ViewStrategy::SingleSource {
            return Ok(candidates.first().map_or(entity, |e| e.target_node));
        }

        // Candidates without provenance carry no evidence and are not scored
        let mut supported = Vec::with_capacity(candidates.len());
        let mut representatives = Vec::with_capacity(candidates.len());
        for edge in &candidates {
            let records = store.list_provenance_by_target(Target::Edge(edge.id))?;
            if let Some(record) = self.select(&records, strategy) {
                supported.push(edge.target_node);
                representatives.push(record.clone());
            }
        }

        let canonical = self
            .select_index(&representatives, strategy)
            .map_or(candidates[0].target_node, |i| supported[i]);
        tracing::debug!(
            parent: &self.span,
            %entity,
            candidates = candidates.len(),
            supported = supported.len(),
            strategy = %strategy,
            "resolved identity"
        );
        Ok(canonical)
    }

    /// Equivalence classes reachable from an entity over `same_as` edges
    ///
    /// Walks asserted `same_as` edges in both directions and unions every
    /// node reached.
    pub fn equivalence_class<S: GraphStore>(
        &self,
        store: &S,
        entity: NodeId,
    ) -> Result<IdentityClasses, S::Error> {
        let mut classes = IdentityClasses::new();
        let mut seen = HashSet::from([entity]);
        let mut queue = VecDeque::from([entity]);

        while let Some(node) = queue.pop_front() {
            for edge in store.list_edges_for_node(node)? {
                if !classes.add_edge(&edge) {
                    continue;
                }
                for next in [edge.source_node, edge.target_node] {
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        Ok(classes)
    }

    /// Smallest id in the entity's `same_as` equivalence class
    pub fn canonical<S: GraphStore>(&self, store: &S, entity: NodeId) -> Result<NodeId, S::Error> {
        Ok(self.equivalence_class(store, entity)?.canonical(entity))
    }
}

fn argmax(records: &[Provenance]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, record) in records.iter().enumerate() {
        let eff = effective_confidence(record);
        if best.map_or(true, |(_, top)| eff > top) {
            best = Some((i, eff));
        }
    }
    best.map(|(i, _)| i)
}

/// Best record that is not a denial
fn argmax_supporting(records: &[Provenance]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, record) in records.iter().enumerate() {
        if record.modality.is_denial() {
            continue;
        }
        let eff = effective_confidence(record);
        if best.map_or(true, |(_, top)| eff > top) {
            best = Some((i, eff));
        }
    }
    best.map(|(i, _)| i)
}

fn argmin(records: &[Provenance]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, record) in records.iter().enumerate() {
        let eff = effective_confidence(record);
        if best.map_or(true, |(_, low)| eff < low) {
            best = Some((i, eff));
        }
    }
    best.map(|(i, _)| i)
}

#[derive(Default)]
struct Ballot {
    votes: i64,
    support: f64,
    best: Option<(usize, f64)>,
}

/// Vote per claim key; denials count against their key
///
/// Only keys with at least one non-denied record can win, since the winner is
/// that key's best supporting record. Ties go to the larger summed effective
/// confidence, then to the key seen first.
fn majority(records: &[Provenance], normalizer: &(dyn ClaimNormalizer + Send + Sync)) -> Option<usize> {
    let mut order: Vec<String> = Vec::new();
    let mut ballots: HashMap<String, Ballot> = HashMap::new();

    for (i, record) in records.iter().enumerate() {
        let Some(key) = normalizer.claim_key(record) else {
            continue;
        };
        let ballot = ballots.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            Ballot::default()
        });
        if record.modality.is_denial() {
            ballot.votes -= 1;
            continue;
        }
        let eff = effective_confidence(record);
        ballot.votes += 1;
        ballot.support += eff;
        if ballot.best.map_or(true, |(_, top)| eff > top) {
            ballot.best = Some((i, eff));
        }
    }

    let mut winner: Option<&Ballot> = None;
    for key in &order {
        let ballot = &ballots[key];
        if ballot.best.is_none() {
            continue;
        }
        let better = match winner {
            None => true,
            Some(w) => {
                ballot.votes > w.votes || (ballot.votes == w.votes && ballot.support > w.support)
            }
        };
        if better {
            winner = Some(ballot);
        }
    }
    winner.and_then(|w| w.best).map(|(i, _)| i)
}
