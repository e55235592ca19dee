//! Provenant Janitor
//!
//! Reconciliation sweep for the provenance graph.
//!
//! # Overview
//!
//! Node and edge writes carry their provenance in the same transaction, but
//! plain `create_node`/`create_edge` calls, older data and databases opened
//! with foreign keys off can still leave the graph inconsistent. The Janitor
//! looks for:
//! - **Orphaned nodes and edges**: elements with zero provenance records
//! - **Dangling edges**: edges whose source or target node is gone
//! - **Corrupt payloads**: property or location JSON that no longer decodes
//!
//! Findings are reported, never repaired.
//!
//! # Usage
//!
//! ## One-time Sweep
//!
//! ```no_run
//! use provenant_janitor::Janitor;
//! use provenant_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("provenant.db")?;
//! let mut janitor = Janitor::default_config();
//!
//! let report = janitor.sweep(&store)?;
//! println!("clean: {}", report.is_clean());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use provenant_janitor::{JanitorConfig, JanitorWorker};
//! use provenant_store::SqliteStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::new("provenant.db")?;
//!     let mut worker = JanitorWorker::new(JanitorConfig::aggressive());
//!     worker.run(store).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [store]
//! path = "provenant.db"
//!
//! [janitor]
//! sweep_interval_minutes = 60
//! sample_limit = 100
//! report_dangling_edges = true
//! scan_payloads = true
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod janitor;
mod metrics;
mod worker;

pub use config::{JanitorConfig, ServiceConfig};
pub use error::JanitorError;
pub use janitor::{Janitor, SweepReport};
pub use metrics::JanitorMetrics;
pub use worker::JanitorWorker;
