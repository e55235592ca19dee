//! Review progress summaries

use crate::ReviewStatus;
use serde::{Deserialize, Serialize};

/// Per-status tallies of provenance records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCounts {
    /// All records counted
    pub total: u64,
    /// Awaiting review
    pub pending: u64,
    /// Approved
    pub approved: u64,
    /// Rejected
    pub rejected: u64,
    /// Content edited by a reviewer
    pub edited: u64,
}

impl ReviewCounts {
    /// Add `n` records with the given status
    pub fn record(&mut self, status: ReviewStatus, n: u64) {
        self.total += n;
        match status {
            ReviewStatus::Pending => self.pending += n,
            ReviewStatus::Approved => self.approved += n,
            ReviewStatus::Rejected => self.rejected += n,
            ReviewStatus::Edited => self.edited += n,
        }
    }

    /// Records a reviewer has acted on
    pub fn reviewed(&self) -> u64 {
        self.total - self.pending
    }
}

/// Review progress for one source document
///
/// Claims are event, attribute and relation nodes; entities are person,
/// place, organization and object nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewProgress {
    /// Provenance on claim nodes
    pub claims: ReviewCounts,
    /// Provenance on entity nodes
    pub entities: ReviewCounts,
}

impl ReviewProgress {
    /// Reviewed records across claims and entities
    pub fn total_reviewed(&self) -> u64 {
        self.claims.reviewed() + self.entities.reviewed()
    }

    /// All records across claims and entities
    pub fn total_items(&self) -> u64 {
        self.claims.total + self.entities.total
    }

    /// Fraction reviewed in [0, 1]; 0 when there is nothing to review
    pub fn fraction_reviewed(&self) -> f64 {
        match self.total_items() {
            0 => 0.0,
            total => self.total_reviewed() as f64 / total as f64,
        }
    }
}
