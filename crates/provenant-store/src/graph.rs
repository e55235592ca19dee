//! Node and edge lifecycle

use crate::ledger::{list_provenance, restamp_target};
use crate::rows::{edge_from_row, node_from_row, sql_limit, EDGE_COLUMNS, NODE_COLUMNS};
use crate::{NodeDeletePolicy, SqliteStore, StoreError};
use provenant_domain::traits::GraphStore;
use provenant_domain::{
    current_timestamp_ms, Edge, EdgeId, EdgeType, NewEdge, NewNode, Node, NodeId, NodeType,
    Properties, Provenance, ReviewStatus, Target,
};
use rusqlite::{params, Connection, OptionalExtension};

fn validate_label(label: &str) -> Result<(), StoreError> {
    if label.trim().is_empty() {
        return Err(StoreError::Validation("node label cannot be empty".to_string()));
    }
    Ok(())
}

pub(crate) fn node_exists(conn: &Connection, id: NodeId) -> Result<bool, StoreError> {
    let found = conn
        .query_row("SELECT 1 FROM nodes WHERE id = ?1", params![id.to_bytes()], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub(crate) fn edge_exists(conn: &Connection, id: EdgeId) -> Result<bool, StoreError> {
    let found = conn
        .query_row("SELECT 1 FROM edges WHERE id = ?1", params![id.to_bytes()], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub(crate) fn insert_node(conn: &Connection, node: &NewNode) -> Result<NodeId, StoreError> {
    validate_label(&node.label)?;
    let id = NodeId::new();
    let now = current_timestamp_ms() as i64;
    conn.execute(
        "INSERT INTO nodes (id, node_type, label, properties, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![
            id.to_bytes(),
            node.node_type.as_str(),
            node.label,
            node.properties.encode()?,
            now,
        ],
    )?;
    Ok(id)
}

pub(crate) fn insert_edge(conn: &Connection, edge: &NewEdge) -> Result<EdgeId, StoreError> {
    for (endpoint, node) in [("source", edge.source_node), ("target", edge.target_node)] {
        if !node_exists(conn, node)? {
            return Err(StoreError::Referential {
                edge_endpoint: endpoint,
                node_id: node.to_string(),
            });
        }
    }

    let id = EdgeId::new();
    conn.execute(
        "INSERT INTO edges (id, edge_type, source_node, target_node, properties, is_negated, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            id.to_bytes(),
            edge.edge_type.as_str(),
            edge.source_node.to_bytes(),
            edge.target_node.to_bytes(),
            edge.properties.encode()?,
            edge.is_negated,
            current_timestamp_ms() as i64,
        ],
    )?;
    Ok(id)
}

fn update_node_row(
    conn: &Connection,
    id: NodeId,
    label: &str,
    properties: &Properties,
) -> Result<(), StoreError> {
    validate_label(label)?;
    let changed = conn.execute(
        "UPDATE nodes SET label = ?1, properties = ?2, updated_at = ?3 WHERE id = ?4",
        params![
            label,
            properties.encode()?,
            current_timestamp_ms() as i64,
            id.to_bytes()
        ],
    )?;
    if changed == 0 {
        return Err(StoreError::not_found("node", id));
    }
    Ok(())
}

impl SqliteStore {
    fn query_nodes(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Node>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let nodes = stmt
            .query_map(params, node_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(nodes)
    }

    fn query_edges(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<Edge>, StoreError> {
        let mut stmt = self.conn.prepare(sql)?;
        let edges = stmt
            .query_map(params, edge_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(edges)
    }

    /// Review edit: replace label and properties and re-stamp every
    /// provenance record of the node as `edited`, in one transaction
    ///
    /// Returns how many records were re-stamped.
    pub fn edit_node(
        &mut self,
        id: NodeId,
        label: &str,
        properties: Properties,
    ) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        update_node_row(&tx, id, label, &properties)?;
        let restamped = restamp_target(&tx, Target::Node(id), ReviewStatus::Edited)?;
        tx.commit()?;

        tracing::info!(parent: &self.span, node_id = %id, restamped, "node edited");
        Ok(restamped)
    }

    /// A node with all of its provenance, in insertion order
    pub fn get_node_with_provenance(
        &self,
        id: NodeId,
    ) -> Result<(Node, Vec<Provenance>), StoreError> {
        let node = self.get_node(id)?;
        let provenance = list_provenance(&self.conn, Target::Node(id))?;
        Ok((node, provenance))
    }

    /// An edge with all of its provenance, in insertion order
    pub fn get_edge_with_provenance(
        &self,
        id: EdgeId,
    ) -> Result<(Edge, Vec<Provenance>), StoreError> {
        let edge = self.get_edge(id)?;
        let provenance = list_provenance(&self.conn, Target::Edge(id))?;
        Ok((edge, provenance))
    }

    /// The document node migrated from a legacy source row, if any
    pub fn find_document_by_legacy_source(
        &self,
        legacy_source_id: &str,
    ) -> Result<Option<Node>, StoreError> {
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM nodes
             WHERE node_type = ?1 AND json_extract(properties, '$.source_id') = ?2
             ORDER BY rowid LIMIT 1"
        );
        let node = self
            .conn
            .query_row(
                &sql,
                params![NodeType::DOCUMENT.as_str(), legacy_source_id],
                node_from_row,
            )
            .optional()?;
        Ok(node)
    }
}

impl GraphStore for SqliteStore {
    type Error = StoreError;

    fn create_node(&mut self, node: NewNode) -> Result<NodeId, Self::Error> {
        let id = insert_node(&self.conn, &node)?;
        tracing::info!(
            parent: &self.span,
            node_id = %id,
            node_type = %node.node_type,
            "node created"
        );
        Ok(id)
    }

    fn create_edge(&mut self, edge: NewEdge) -> Result<EdgeId, Self::Error> {
        let id = insert_edge(&self.conn, &edge)?;
        tracing::info!(
            parent: &self.span,
            edge_id = %id,
            edge_type = %edge.edge_type,
            source = %edge.source_node,
            target = %edge.target_node,
            "edge created"
        );
        Ok(id)
    }

    fn get_node(&self, id: NodeId) -> Result<Node, Self::Error> {
        let sql = format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id.to_bytes()], node_from_row)
            .optional()?
            .ok_or_else(|| StoreError::not_found("node", id))
    }

    fn get_edge(&self, id: EdgeId) -> Result<Edge, Self::Error> {
        let sql = format!("SELECT {EDGE_COLUMNS} FROM edges WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id.to_bytes()], edge_from_row)
            .optional()?
            .ok_or_else(|| StoreError::not_found("edge", id))
    }

    fn update_node(
        &mut self,
        id: NodeId,
        label: &str,
        properties: Properties,
    ) -> Result<(), Self::Error> {
        update_node_row(&self.conn, id, label, &properties)?;
        tracing::info!(parent: &self.span, node_id = %id, "node updated");
        Ok(())
    }

    fn update_edge_properties(
        &mut self,
        id: EdgeId,
        properties: Properties,
    ) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE edges SET properties = ?1 WHERE id = ?2",
            params![properties.encode()?, id.to_bytes()],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("edge", id));
        }
        tracing::info!(parent: &self.span, edge_id = %id, "edge properties updated");
        Ok(())
    }

    fn list_nodes_by_type(
        &self,
        node_type: &NodeType,
        limit: usize,
    ) -> Result<Vec<Node>, Self::Error> {
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM nodes WHERE node_type = ?1 ORDER BY rowid LIMIT ?2"
        );
        self.query_nodes(&sql, params![node_type.as_str(), sql_limit(limit)])
    }

    fn list_nodes_by_source(&self, source_id: NodeId) -> Result<Vec<Node>, Self::Error> {
        let sql = format!(
            "SELECT {NODE_COLUMNS} FROM nodes
             WHERE id IN (SELECT target_id FROM provenance
                          WHERE target_type = 'node' AND source_id = ?1)
             ORDER BY rowid"
        );
        let nodes = self.query_nodes(&sql, params![source_id.to_bytes()])?;
        tracing::debug!(parent: &self.span, source = %source_id, count = nodes.len(), "nodes by source");
        Ok(nodes)
    }

    fn list_edges_by_type(
        &self,
        edge_type: &EdgeType,
        limit: usize,
    ) -> Result<Vec<Edge>, Self::Error> {
        let sql = format!(
            "SELECT {EDGE_COLUMNS} FROM edges WHERE edge_type = ?1 ORDER BY rowid LIMIT ?2"
        );
        self.query_edges(&sql, params![edge_type.as_str(), sql_limit(limit)])
    }

    fn list_edges_by_source(&self, source_id: NodeId) -> Result<Vec<Edge>, Self::Error> {
        let sql = format!(
            "SELECT {EDGE_COLUMNS} FROM edges
             WHERE id IN (SELECT target_id FROM provenance
                          WHERE target_type = 'edge' AND source_id = ?1)
             ORDER BY rowid"
        );
        self.query_edges(&sql, params![source_id.to_bytes()])
    }

    fn list_edges_for_node(&self, node_id: NodeId) -> Result<Vec<Edge>, Self::Error> {
        let sql = format!(
            "SELECT {EDGE_COLUMNS} FROM edges
             WHERE source_node = ?1 OR target_node = ?1
             ORDER BY rowid"
        );
        self.query_edges(&sql, params![node_id.to_bytes()])
    }

    fn delete_node(&mut self, id: NodeId) -> Result<(), Self::Error> {
        let policy = self.config.node_delete_policy;
        let id_bytes = id.to_bytes();
        let tx = self.conn.transaction()?;

        if !node_exists(&tx, id)? {
            return Err(StoreError::not_found("node", id));
        }

        let incident: i64 = tx.query_row(
            "SELECT COUNT(*) FROM edges WHERE source_node = ?1 OR target_node = ?1",
            params![id_bytes],
            |row| row.get(0),
        )?;
        if incident > 0 && policy == NodeDeletePolicy::Restrict {
            return Err(StoreError::Referential {
                edge_endpoint: "incident",
                node_id: id.to_string(),
            });
        }

        let edge_provenance = tx.execute(
            "DELETE FROM provenance WHERE target_type = 'edge' AND target_id IN
                 (SELECT id FROM edges WHERE source_node = ?1 OR target_node = ?1)",
            params![id_bytes],
        )?;
        let edges = tx.execute(
            "DELETE FROM edges WHERE source_node = ?1 OR target_node = ?1",
            params![id_bytes],
        )?;
        let node_provenance = tx.execute(
            "DELETE FROM provenance WHERE target_type = 'node' AND target_id = ?1",
            params![id_bytes],
        )?;
        tx.execute("DELETE FROM nodes WHERE id = ?1", params![id_bytes])?;
        tx.commit()?;

        tracing::info!(
            parent: &self.span,
            node_id = %id,
            edges,
            provenance = edge_provenance + node_provenance,
            "node deleted"
        );
        Ok(())
    }

    fn delete_edge(&mut self, id: EdgeId) -> Result<(), Self::Error> {
        let id_bytes = id.to_bytes();
        let tx = self.conn.transaction()?;

        if !edge_exists(&tx, id)? {
            return Err(StoreError::not_found("edge", id));
        }
        let provenance = tx.execute(
            "DELETE FROM provenance WHERE target_type = 'edge' AND target_id = ?1",
            params![id_bytes],
        )?;
        tx.execute("DELETE FROM edges WHERE id = ?1", params![id_bytes])?;
        tx.commit()?;

        tracing::info!(parent: &self.span, edge_id = %id, provenance, "edge deleted");
        Ok(())
    }
}
