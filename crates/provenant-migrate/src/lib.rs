//! Provenant Migrate
//!
//! Converts documents from the legacy flat relational schema (sources,
//! chunks, entities, claims, relationships, claim participants) into the
//! provenance-qualified graph.
//!
//! Every node and edge written gets a provenance record that points back at
//! the document node, so the graph keeps the lineage the flat schema carried
//! implicitly. A migration is **not atomic**: the document node is required,
//! every later item is best-effort, and the returned [`MigrationReport`]
//! lists what was skipped so callers can decide whether a partial result is
//! acceptable.
//!
//! ## Example
//!
//! ```rust,ignore
//! use provenant_migrate::{LegacyDocument, MigrationConfig, Migrator};
//! use provenant_store::SqliteStore;
//!
//! let store = SqliteStore::new("graph.db")?;
//! let mut migrator = Migrator::new(store, MigrationConfig::default())?;
//! let report = migrator.migrate_document(&LegacyDocument::from_json(&export)?)?;
//! if !report.is_complete() {
//!     eprintln!("partial migration: {}", report.summary());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod error;
mod legacy;
mod migrator;
mod report;

pub use config::MigrationConfig;
pub use error::{ConfigError, MigrationError};
pub use legacy::{
    LegacyChunk, LegacyClaim, LegacyClaimEntity, LegacyDocument, LegacyEntity,
    LegacyRelationship, LegacySource,
};
pub use migrator::Migrator;
pub use report::{ItemKind, MigrationCounts, MigrationReport, SkippedItem};
