//! Metrics collection for Janitor operations

use crate::janitor::SweepReport;
use provenant_domain::traits::GraphCounts;

/// Cumulative metrics across Janitor sweeps
///
/// Finding totals add up what each sweep reported, so an orphan that
/// survives three sweeps is counted three times.
#[derive(Debug, Clone, Default)]
pub struct JanitorMetrics {
    /// Total sweep iterations completed
    pub sweep_count: usize,

    /// Sweeps that failed before producing a report
    pub failed_sweeps: usize,

    /// Orphaned nodes reported
    pub orphaned_nodes: usize,

    /// Orphaned edges reported
    pub orphaned_edges: usize,

    /// Dangling edges reported
    pub dangling_edges: usize,

    /// Undecodable payloads reported
    pub corrupt_payloads: usize,

    /// Sweeps that found nothing
    pub clean_sweeps: usize,

    /// Element counts seen by the latest sweep
    pub last_counts: Option<GraphCounts>,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed sweep
    pub fn record_sweep(&mut self, report: &SweepReport) {
        self.sweep_count += 1;
        self.orphaned_nodes += report.orphaned_nodes.len();
        self.orphaned_edges += report.orphaned_edges.len();
        self.dangling_edges += report.dangling_edges.len();
        self.corrupt_payloads += report.corrupt_payloads.len();
        if report.is_clean() {
            self.clean_sweeps += 1;
        }
        self.last_counts = Some(report.counts);
    }

    /// Record a sweep that failed
    pub fn record_failure(&mut self) {
        self.failed_sweeps += 1;
    }

    /// Findings of every kind
    pub fn total_findings(&self) -> usize {
        self.orphaned_nodes + self.orphaned_edges + self.dangling_edges + self.corrupt_payloads
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Failed sweeps: {}", self.failed_sweeps),
            format!("Clean sweeps: {}", self.clean_sweeps),
            format!("Total runtime: {}ms", self.total_runtime_ms),
        ];

        if self.total_findings() > 0 {
            lines.push(String::new());
            lines.push("Findings:".to_string());
            lines.push(format!("  Orphaned nodes: {}", self.orphaned_nodes));
            lines.push(format!("  Orphaned edges: {}", self.orphaned_edges));
            lines.push(format!("  Dangling edges: {}", self.dangling_edges));
            lines.push(format!("  Corrupt payloads: {}", self.corrupt_payloads));
        }

        if let Some(counts) = self.last_counts {
            lines.push(String::new());
            lines.push(format!(
                "Graph size: {} nodes, {} edges, {} provenance",
                counts.nodes, counts.edges, counts.provenance
            ));
        }

        lines.join("\n")
    }
}
