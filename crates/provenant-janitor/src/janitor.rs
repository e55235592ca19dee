//! Core Janitor implementation for the reconciliation sweep

use crate::{JanitorConfig, JanitorError, JanitorMetrics};
use provenant_domain::traits::{CorruptPayload, GraphAudit, GraphCounts};
use provenant_domain::{EdgeId, NodeId};
use serde::Serialize;
use std::fmt::Display;
use std::time::Instant;
use tracing::Span;

/// What one sweep found
///
/// Each list holds at most `sample_limit` entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepReport {
    /// Nodes without any provenance
    pub orphaned_nodes: Vec<NodeId>,
    /// Edges without any provenance
    pub orphaned_edges: Vec<EdgeId>,
    /// Edges whose source or target node is gone
    pub dangling_edges: Vec<EdgeId>,
    /// Stored payloads that fail strict decoding
    pub corrupt_payloads: Vec<CorruptPayload>,
    /// Element counts at sweep time
    pub counts: GraphCounts,
}

impl SweepReport {
    /// Whether the sweep found nothing
    pub fn is_clean(&self) -> bool {
        self.total_findings() == 0
    }

    /// Findings of every kind
    pub fn total_findings(&self) -> usize {
        self.orphaned_nodes.len()
            + self.orphaned_edges.len()
            + self.dangling_edges.len()
            + self.corrupt_payloads.len()
    }
}

/// Janitor service for the reconciliation sweep
///
/// Finds nodes and edges that ended up without provenance, edges pointing
/// at missing nodes, and payloads that no longer decode. The Janitor only
/// reports; repairing or deleting is left to an operator.
///
/// # Examples
///
/// ```no_run
/// use provenant_janitor::Janitor;
/// use provenant_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqliteStore::new("provenant.db")?;
/// let mut janitor = Janitor::default_config();
///
/// let report = janitor.sweep(&store)?;
/// println!("{} findings", report.total_findings());
/// println!("{}", janitor.metrics().summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    metrics: JanitorMetrics,
    span: Span,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self {
            config,
            metrics: JanitorMetrics::new(),
            span: Span::none(),
        }
    }

    /// Create a Janitor with default configuration
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Emit events under the given span
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Perform one sweep
    ///
    /// Failed sweeps are counted in the metrics before the error is returned.
    pub fn sweep<S>(&mut self, store: &S) -> Result<SweepReport, JanitorError>
    where
        S: GraphAudit,
        S::Error: Display,
    {
        let span = self.span.clone();
        let _entered = span.enter();
        let start = Instant::now();

        let result = self.collect(store);
        self.metrics.total_runtime_ms += start.elapsed().as_millis() as u64;

        match result {
            Ok(report) => {
                self.metrics.record_sweep(&report);
                if report.is_clean() {
                    tracing::info!(nodes = report.counts.nodes, edges = report.counts.edges, "sweep clean");
                } else {
                    tracing::warn!(
                        orphaned_nodes = report.orphaned_nodes.len(),
                        orphaned_edges = report.orphaned_edges.len(),
                        dangling_edges = report.dangling_edges.len(),
                        corrupt_payloads = report.corrupt_payloads.len(),
                        "sweep found inconsistencies"
                    );
                }
                Ok(report)
            }
            Err(e) => {
                self.metrics.record_failure();
                tracing::error!(error = %e, "sweep failed");
                Err(e)
            }
        }
    }

    fn collect<S>(&self, store: &S) -> Result<SweepReport, JanitorError>
    where
        S: GraphAudit,
        S::Error: Display,
    {
        let limit = self.config.sample_limit;
        let store_err = |e: S::Error| JanitorError::Store(e.to_string());

        let mut report = SweepReport {
            counts: store.counts().map_err(store_err)?,
            ..Default::default()
        };

        for node in store.find_orphaned_nodes(limit).map_err(store_err)? {
            tracing::debug!(node_id = %node.id, node_type = %node.node_type, label = %node.label, "orphaned node");
            report.orphaned_nodes.push(node.id);
        }
        for edge in store.find_orphaned_edges(limit).map_err(store_err)? {
            tracing::debug!(edge_id = %edge.id, edge_type = %edge.edge_type, "orphaned edge");
            report.orphaned_edges.push(edge.id);
        }
        if self.config.report_dangling_edges {
            report.dangling_edges = store.find_dangling_edges(limit).map_err(store_err)?;
        }
        if self.config.scan_payloads {
            report.corrupt_payloads = store.find_corrupt_payloads(limit).map_err(store_err)?;
        }
        Ok(report)
    }
}
