//! Read-only integrity queries for the reconciliation sweep

use crate::rows::{edge_from_row, node_from_row, sql_limit, EDGE_COLUMNS, NODE_COLUMNS};
use crate::{SqliteStore, StoreError};
use provenant_domain::traits::{CorruptPayload, GraphAudit, GraphCounts};
use provenant_domain::{Edge, EdgeId, Location, Node, Properties};
use rusqlite::params;

impl SqliteStore {
    /// Scan one JSON column, strictly decoding each value
    fn scan_payloads(
        &self,
        table: &str,
        field: &'static str,
        strict: fn(&str) -> Result<(), serde_json::Error>,
        limit: usize,
        found: &mut Vec<CorruptPayload>,
    ) -> Result<(), StoreError> {
        let sql = format!("SELECT id, {field} FROM {table} ORDER BY rowid");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            if found.len() >= limit {
                break;
            }
            let id: Vec<u8> = row.get(0)?;
            let payload: String = row.get(1)?;
            if let Err(e) = strict(&payload) {
                let owner = match id.as_slice().try_into() {
                    Ok(bytes) => format!("{}:{}", table, uuid_text(bytes)),
                    Err(_) => format!("{}:<malformed id>", table),
                };
                found.push(CorruptPayload {
                    owner,
                    field,
                    error: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Number of nodes
    pub fn count_nodes(&self) -> Result<u64, StoreError> {
        self.count("nodes")
    }

    /// Number of edges
    pub fn count_edges(&self) -> Result<u64, StoreError> {
        self.count("edges")
    }

    /// Number of provenance records
    pub fn count_provenance(&self) -> Result<u64, StoreError> {
        self.count("provenance")
    }

    fn count(&self, table: &str) -> Result<u64, StoreError> {
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }
}

fn uuid_text(bytes: [u8; 16]) -> String {
    provenant_domain::NodeId::from_value(u128::from_be_bytes(bytes)).to_string()
}

fn strict_properties(text: &str) -> Result<(), serde_json::Error> {
    Properties::decode(text).map(|_| ())
}

fn strict_location(text: &str) -> Result<(), serde_json::Error> {
    Location::decode(text).map(|_| ())
}

impl GraphAudit for SqliteStore {
    fn find_orphaned_nodes(&self, limit: usize) -> Result<Vec<Node>, Self::Error> {
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM nodes n
             WHERE NOT EXISTS (SELECT 1 FROM provenance p
                               WHERE p.target_type = 'node' AND p.target_id = n.id)
             ORDER BY n.rowid LIMIT ?1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let nodes = stmt
            .query_map(params![sql_limit(limit)], node_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(nodes)
    }

    fn find_orphaned_edges(&self, limit: usize) -> Result<Vec<Edge>, Self::Error> {
        let sql = format!(
            "SELECT {EDGE_COLUMNS} FROM edges e
             WHERE NOT EXISTS (SELECT 1 FROM provenance p
                               WHERE p.target_type = 'edge' AND p.target_id = e.id)
             ORDER BY e.rowid LIMIT ?1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let edges = stmt
            .query_map(params![sql_limit(limit)], edge_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(edges)
    }

    fn find_dangling_edges(&self, limit: usize) -> Result<Vec<EdgeId>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT e.id FROM edges e
             WHERE NOT EXISTS (SELECT 1 FROM nodes n WHERE n.id = e.source_node)
                OR NOT EXISTS (SELECT 1 FROM nodes n WHERE n.id = e.target_node)
             ORDER BY e.rowid LIMIT ?1",
        )?;
        let ids = stmt
            .query_map(params![sql_limit(limit)], |row| {
                let bytes: Vec<u8> = row.get(0)?;
                EdgeId::from_bytes(&bytes).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        0,
                        rusqlite::types::Type::Blob,
                        e.into(),
                    )
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn find_corrupt_payloads(&self, limit: usize) -> Result<Vec<CorruptPayload>, Self::Error> {
        let mut found = Vec::new();
        self.scan_payloads("nodes", "properties", strict_properties, limit, &mut found)?;
        self.scan_payloads("edges", "properties", strict_properties, limit, &mut found)?;
        self.scan_payloads("provenance", "location", strict_location, limit, &mut found)?;
        Ok(found)
    }

    fn counts(&self) -> Result<GraphCounts, Self::Error> {
        Ok(GraphCounts {
            nodes: self.count_nodes()?,
            edges: self.count_edges()?,
            provenance: self.count_provenance()?,
        })
    }
}
