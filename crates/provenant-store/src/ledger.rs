//! Provenance ledger: append, list, review-status transitions

use crate::graph::{edge_exists, insert_edge, insert_node, node_exists};
use crate::rows::{provenance_from_row, target_bytes, PROVENANCE_COLUMNS};
use crate::{SqliteStore, StoreError};
use provenant_domain::traits::{AtomicGraph, ProvenanceLedger};
use provenant_domain::{
    current_timestamp_ms, EdgeId, NewEdge, NewNode, NewProvenance, NodeId, NodeType, Provenance,
    ProvenanceId, ReviewProgress, ReviewStatus, Target,
};
use rusqlite::{params, Connection, OptionalExtension};

fn target_exists(conn: &Connection, target: Target) -> Result<bool, StoreError> {
    match target {
        Target::Node(id) => node_exists(conn, id),
        Target::Edge(id) => edge_exists(conn, id),
    }
}

pub(crate) fn insert_provenance(
    conn: &Connection,
    target: Target,
    params: NewProvenance,
) -> Result<ProvenanceId, StoreError> {
    if !target_exists(conn, target)? {
        return Err(StoreError::not_found(target.target_type().as_str(), target));
    }

    let record = params.into_record(ProvenanceId::new(), target, current_timestamp_ms());
    conn.execute(
        "INSERT INTO provenance (id, target_type, target_id, source_id, excerpt, location,
             confidence, trust, modality, status, claimed_time_start, claimed_time_end,
             claimed_time_text, claimed_geo_region, claimed_geo_text, claimed_by, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
        params![
            record.id.to_bytes(),
            record.target.target_type().as_str(),
            target_bytes(record.target),
            record.source_id.to_bytes(),
            record.excerpt,
            record.location.encode()?,
            record.confidence,
            record.trust,
            record.modality.as_str(),
            record.status.as_str(),
            record.claimed_time_start,
            record.claimed_time_end,
            record.claimed_time_text,
            record.claimed_geo_region,
            record.claimed_geo_text,
            record.claimed_by.map(|id| id.to_bytes()),
            record.created_at as i64,
        ],
    )?;
    Ok(record.id)
}

pub(crate) fn list_provenance(
    conn: &Connection,
    target: Target,
) -> Result<Vec<Provenance>, StoreError> {
    let sql = format!(
        "SELECT {PROVENANCE_COLUMNS} FROM provenance
         WHERE target_type = ?1 AND target_id = ?2
         ORDER BY rowid"
    );
    let mut stmt = conn.prepare(&sql)?;
    let records = stmt
        .query_map(
            params![target.target_type().as_str(), target_bytes(target)],
            provenance_from_row,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

pub(crate) fn restamp_target(
    conn: &Connection,
    target: Target,
    status: ReviewStatus,
) -> Result<usize, StoreError> {
    let changed = conn.execute(
        "UPDATE provenance SET status = ?1 WHERE target_type = ?2 AND target_id = ?3",
        params![
            status.as_str(),
            target.target_type().as_str(),
            target_bytes(target)
        ],
    )?;
    Ok(changed)
}

impl SqliteStore {
    /// Review progress for everything derived from one source document
    ///
    /// Counts provenance records citing `source_id`, split by whether the
    /// target node is a claim or an entity. Other node kinds are not counted.
    pub fn review_progress(&self, source_id: NodeId) -> Result<ReviewProgress, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT n.node_type, p.status, COUNT(*)
             FROM provenance p JOIN nodes n ON p.target_id = n.id
             WHERE p.target_type = 'node' AND p.source_id = ?1
             GROUP BY n.node_type, p.status",
        )?;
        let rows = stmt
            .query_map(params![source_id.to_bytes()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut progress = ReviewProgress::default();
        for (node_type, status, count) in rows {
            let status = status.parse::<ReviewStatus>().map_err(StoreError::Validation)?;
            let Ok(node_type) = NodeType::new(&node_type) else {
                continue;
            };
            let count = count.max(0) as u64;
            if node_type.is_claim() {
                progress.claims.record(status, count);
            } else if node_type.is_entity() {
                progress.entities.record(status, count);
            }
        }
        Ok(progress)
    }
}

impl ProvenanceLedger for SqliteStore {
    fn create_provenance(
        &mut self,
        target: Target,
        params: NewProvenance,
    ) -> Result<ProvenanceId, Self::Error> {
        let status = params.status;
        let id = insert_provenance(&self.conn, target, params)?;
        tracing::info!(
            parent: &self.span,
            provenance_id = %id,
            %target,
            %status,
            "provenance appended"
        );
        Ok(id)
    }

    fn get_provenance(&self, id: ProvenanceId) -> Result<Provenance, Self::Error> {
        let sql = format!("SELECT {PROVENANCE_COLUMNS} FROM provenance WHERE id = ?1");
        self.conn
            .query_row(&sql, params![id.to_bytes()], provenance_from_row)
            .optional()?
            .ok_or_else(|| StoreError::not_found("provenance", id))
    }

    fn list_provenance_by_target(&self, target: Target) -> Result<Vec<Provenance>, Self::Error> {
        let records = list_provenance(&self.conn, target)?;
        tracing::debug!(parent: &self.span, %target, count = records.len(), "provenance by target");
        Ok(records)
    }

    fn list_provenance_by_source(
        &self,
        source_id: NodeId,
    ) -> Result<Vec<Provenance>, Self::Error> {
        let sql = format!(
            "SELECT {PROVENANCE_COLUMNS} FROM provenance WHERE source_id = ?1 ORDER BY rowid"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params![source_id.to_bytes()], provenance_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn update_provenance_status(
        &mut self,
        id: ProvenanceId,
        status: ReviewStatus,
    ) -> Result<(), Self::Error> {
        let changed = self.conn.execute(
            "UPDATE provenance SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id.to_bytes()],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("provenance", id));
        }
        tracing::info!(parent: &self.span, provenance_id = %id, %status, "provenance status updated");
        Ok(())
    }

    /// Touches every record of the target, `denied` ones included. Repeating
    /// the call is harmless and concurrent callers resolve last-write-wins.
    fn update_provenance_status_by_target(
        &mut self,
        target: Target,
        status: ReviewStatus,
    ) -> Result<usize, Self::Error> {
        let changed = restamp_target(&self.conn, target, status)?;
        tracing::info!(parent: &self.span, %target, %status, changed, "provenance status updated by target");
        Ok(changed)
    }

    fn delete_provenance(&mut self, id: ProvenanceId) -> Result<(), Self::Error> {
        let changed = self
            .conn
            .execute("DELETE FROM provenance WHERE id = ?1", params![id.to_bytes()])?;
        if changed == 0 {
            return Err(StoreError::not_found("provenance", id));
        }
        tracing::info!(parent: &self.span, provenance_id = %id, "provenance deleted");
        Ok(())
    }
}

impl AtomicGraph for SqliteStore {
    fn create_node_with_provenance(
        &mut self,
        node: NewNode,
        provenance: NewProvenance,
    ) -> Result<(NodeId, ProvenanceId), Self::Error> {
        let tx = self.conn.transaction()?;
        let node_id = insert_node(&tx, &node)?;
        let provenance_id = insert_provenance(&tx, Target::Node(node_id), provenance)?;
        tx.commit()?;

        tracing::info!(
            parent: &self.span,
            %node_id,
            node_type = %node.node_type,
            %provenance_id,
            "node created with provenance"
        );
        Ok((node_id, provenance_id))
    }

    fn create_edge_with_provenance(
        &mut self,
        edge: NewEdge,
        provenance: NewProvenance,
    ) -> Result<(EdgeId, ProvenanceId), Self::Error> {
        let tx = self.conn.transaction()?;
        let edge_id = insert_edge(&tx, &edge)?;
        let provenance_id = insert_provenance(&tx, Target::Edge(edge_id), provenance)?;
        tx.commit()?;

        tracing::info!(
            parent: &self.span,
            %edge_id,
            edge_type = %edge.edge_type,
            %provenance_id,
            "edge created with provenance"
        );
        Ok((edge_id, provenance_id))
    }

    fn create_self_sourced_node(
        &mut self,
        node: NewNode,
        mut provenance: NewProvenance,
    ) -> Result<(NodeId, ProvenanceId), Self::Error> {
        let tx = self.conn.transaction()?;
        let node_id = insert_node(&tx, &node)?;
        provenance.source_id = node_id;
        let provenance_id = insert_provenance(&tx, Target::Node(node_id), provenance)?;
        tx.commit()?;

        tracing::info!(
            parent: &self.span,
            %node_id,
            node_type = %node.node_type,
            %provenance_id,
            "self-sourced node created"
        );
        Ok((node_id, provenance_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use provenant_domain::traits::GraphStore;
    use provenant_domain::EdgeType;

    fn refuse_provenance_inserts(store: &SqliteStore) {
        store
            .conn
            .execute_batch(
                "CREATE TEMP TRIGGER refuse_provenance BEFORE INSERT ON provenance
                 BEGIN SELECT RAISE(ABORT, 'provenance writes disabled'); END;",
            )
            .unwrap();
    }

    #[test]
    fn test_node_rolled_back_when_provenance_fails() {
        let mut store = SqliteStore::in_memory().unwrap();
        let doc = store
            .create_node(NewNode::new(NodeType::DOCUMENT, "Emma"))
            .unwrap();
        refuse_provenance_inserts(&store);

        let result = store.create_node_with_provenance(
            NewNode::new(NodeType::PERSON, "Harriet Smith"),
            NewProvenance::new(doc),
        );
        assert!(matches!(result, Err(StoreError::Persistence(_))));
        assert_eq!(store.count_nodes().unwrap(), 1);
        assert!(store
            .list_nodes_by_type(&NodeType::PERSON, 10)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_edge_rolled_back_when_provenance_fails() {
        let mut store = SqliteStore::in_memory().unwrap();
        let a = store.create_node(NewNode::new(NodeType::PERSON, "Emma")).unwrap();
        let b = store.create_node(NewNode::new(NodeType::PERSON, "Knightley")).unwrap();
        refuse_provenance_inserts(&store);

        let result = store.create_edge_with_provenance(
            NewEdge::new(EdgeType::RELATED_TO, a, b),
            NewProvenance::new(a),
        );
        assert!(result.is_err());
        assert_eq!(store.count_edges().unwrap(), 0);
    }

    #[test]
    fn test_self_sourced_node_cites_itself() {
        let mut store = SqliteStore::in_memory().unwrap();
        let (doc, provenance_id) = store
            .create_self_sourced_node(
                NewNode::new(NodeType::DOCUMENT, "Mansfield Park"),
                NewProvenance::new(NodeId::nil()).excerpt("Document: Mansfield Park"),
            )
            .unwrap();

        let record = store.get_provenance(provenance_id).unwrap();
        assert_eq!(record.source_id, doc);
        assert_eq!(record.target, Target::Node(doc));
    }

    #[test]
    fn test_self_sourced_node_rolled_back_when_provenance_fails() {
        let mut store = SqliteStore::in_memory().unwrap();
        refuse_provenance_inserts(&store);

        let result = store.create_self_sourced_node(
            NewNode::new(NodeType::DOCUMENT, "Mansfield Park"),
            NewProvenance::new(NodeId::nil()),
        );
        assert!(matches!(result, Err(StoreError::Persistence(_))));
        assert_eq!(store.count_nodes().unwrap(), 0);
        assert_eq!(store.count_provenance().unwrap(), 0);
    }

    #[test]
    fn test_provenance_for_missing_target() {
        let mut store = SqliteStore::in_memory().unwrap();
        let err = store
            .create_provenance(Target::Edge(EdgeId::new()), NewProvenance::new(NodeId::new()))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "edge", .. }));
    }

    #[test]
    fn test_scores_clamped_on_write() {
        let mut store = SqliteStore::in_memory().unwrap();
        let doc = store
            .create_node(NewNode::new(NodeType::DOCUMENT, "Sanditon"))
            .unwrap();
        let id = store
            .create_provenance(
                Target::Node(doc),
                NewProvenance::new(doc).confidence(1.4).trust(f64::NAN),
            )
            .unwrap();
        let record = store.get_provenance(id).unwrap();
        assert_eq!(record.confidence, 1.0);
        assert_eq!(record.trust, 0.0);
    }
}
