//! Provenant Storage Layer
//!
//! Implements the [`GraphStore`], [`ProvenanceLedger`], [`AtomicGraph`] and
//! [`GraphAudit`] traits on SQLite.
//!
//! # Architecture
//!
//! - One table each for nodes, edges and provenance (see `schema.sql`)
//! - Edge endpoints are foreign keys with `ON DELETE CASCADE`, and are also
//!   checked in code so a clear [`StoreError::Referential`] comes back
//! - Provenance targets are polymorphic, so their cascade runs explicitly in
//!   the same transaction as the node or edge delete
//! - Creating an element together with its first provenance record is one
//!   transaction; nothing is left orphaned if either write fails
//!
//! # Examples
//!
//! ```
//! use provenant_domain::traits::{AtomicGraph, GraphStore, ProvenanceLedger};
//! use provenant_domain::{NewNode, NewProvenance, NodeType, Target};
//! use provenant_store::SqliteStore;
//!
//! let mut store = SqliteStore::in_memory().unwrap();
//! let doc = store.create_node(NewNode::new(NodeType::DOCUMENT, "Persuasion")).unwrap();
//! let (person, _) = store
//!     .create_node_with_provenance(
//!         NewNode::new(NodeType::PERSON, "Anne Elliot"),
//!         NewProvenance::new(doc).excerpt("Anne, with an elegant little mind").confidence(0.9),
//!     )
//!     .unwrap();
//!
//! assert_eq!(store.list_provenance_by_target(Target::Node(person)).unwrap().len(), 1);
//! ```
//!
//! # Thread Safety
//!
//! SQLite connections are not thread-safe. Each thread should have its own
//! `SqliteStore`; with WAL enabled, several stores can share one database file.

#![warn(missing_docs)]

mod audit;
pub mod config;
mod error;
mod graph;
mod ledger;
mod rows;

pub use config::{ConfigError, NodeDeletePolicy, StoreConfig};
pub use error::StoreError;

// Traits re-exported so callers need only this crate in scope
pub use provenant_domain::traits::{AtomicGraph, GraphAudit, GraphStore, ProvenanceLedger};

use rusqlite::Connection;
use std::path::Path;

/// SQLite-based implementation of the graph store traits
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    config: StoreConfig,
    span: tracing::Span,
}

impl SqliteStore {
    /// Open (or create) a database file with default settings
    ///
    /// Use `:memory:` for an in-memory database.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use provenant_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("provenant.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let config = if path.as_ref().as_os_str() == ":memory:" {
            StoreConfig::in_memory()
        } else {
            StoreConfig::at(path)
        };
        Self::with_config(config)
    }

    /// A private in-memory database
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::with_config(StoreConfig::in_memory())
    }

    /// Open a database as described by `config`
    pub fn with_config(config: StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;
        let conn = Connection::open(&config.path)?;
        let mut store = Self {
            conn,
            config,
            span: tracing::Span::none(),
        };
        store.apply_pragmas()?;
        store.initialize_schema()?;
        Ok(store)
    }

    /// Emit events under the given span
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    /// The configuration this store was opened with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    fn apply_pragmas(&mut self) -> Result<(), StoreError> {
        self.conn.busy_timeout(self.config.busy_timeout())?;
        if self.config.wal && !self.config.is_in_memory() {
            self.conn
                .execute_batch("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;")?;
        }
        let fk = if self.config.enforce_foreign_keys { "ON" } else { "OFF" };
        self.conn.pragma_update(None, "foreign_keys", fk)?;
        Ok(())
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        tracing::debug!(parent: &self.span, path = %self.config.path.display(), "schema ready");
        Ok(())
    }
}
