//! Row mapping between SQLite and domain types

use provenant_domain::{
    Edge, EdgeId, EdgeType, Location, Modality, Node, NodeId, NodeType, Properties, Provenance,
    ProvenanceId, ReviewStatus, Target, TargetType,
};
use rusqlite::types::Type;
use rusqlite::Row;

pub(crate) const NODE_COLUMNS: &str = "id, node_type, label, properties, created_at, updated_at";

pub(crate) const EDGE_COLUMNS: &str =
    "id, edge_type, source_node, target_node, properties, is_negated, created_at";

pub(crate) const PROVENANCE_COLUMNS: &str = "id, target_type, target_id, source_id, excerpt, \
     location, confidence, trust, modality, status, claimed_time_start, claimed_time_end, \
     claimed_time_text, claimed_geo_region, claimed_geo_text, claimed_by, created_at";

/// Wrap a decode failure as a rusqlite conversion error for column `idx`
fn conversion(idx: usize, ty: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, message.into())
}

fn blob_id<T>(
    row: &Row<'_>,
    idx: usize,
    parse: impl Fn(&[u8]) -> Result<T, String>,
) -> rusqlite::Result<T> {
    let bytes: Vec<u8> = row.get(idx)?;
    parse(&bytes).map_err(|e| conversion(idx, Type::Blob, e))
}

fn text_as<T>(
    row: &Row<'_>,
    idx: usize,
    parse: impl Fn(&str) -> Result<T, String>,
) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    parse(&text).map_err(|e| conversion(idx, Type::Text, e))
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    Ok(row.get::<_, i64>(idx)?.max(0) as u64)
}

pub(crate) fn node_from_row(row: &Row<'_>) -> rusqlite::Result<Node> {
    let properties: String = row.get(3)?;
    Ok(Node {
        id: blob_id(row, 0, NodeId::from_bytes)?,
        node_type: text_as(row, 1, NodeType::new)?,
        label: row.get(2)?,
        properties: Properties::decode_lenient(&properties),
        created_at: timestamp(row, 4)?,
        updated_at: timestamp(row, 5)?,
    })
}

pub(crate) fn edge_from_row(row: &Row<'_>) -> rusqlite::Result<Edge> {
    let properties: String = row.get(4)?;
    Ok(Edge {
        id: blob_id(row, 0, EdgeId::from_bytes)?,
        edge_type: text_as(row, 1, EdgeType::new)?,
        source_node: blob_id(row, 2, NodeId::from_bytes)?,
        target_node: blob_id(row, 3, NodeId::from_bytes)?,
        properties: Properties::decode_lenient(&properties),
        is_negated: row.get(5)?,
        created_at: timestamp(row, 6)?,
    })
}

pub(crate) fn provenance_from_row(row: &Row<'_>) -> rusqlite::Result<Provenance> {
    let target_type = text_as(row, 1, |s| s.parse::<TargetType>())?;
    let target_raw = blob_id(row, 2, |b| NodeId::from_bytes(b).map(|id| id.value()))?;
    let location: String = row.get(5)?;
    let claimed_by: Option<Vec<u8>> = row.get(15)?;
    let claimed_by = claimed_by
        .map(|bytes| NodeId::from_bytes(&bytes).map_err(|e| conversion(15, Type::Blob, e)))
        .transpose()?;

    Ok(Provenance {
        id: blob_id(row, 0, ProvenanceId::from_bytes)?,
        target: Target::from_parts(target_type, target_raw),
        source_id: blob_id(row, 3, NodeId::from_bytes)?,
        excerpt: row.get(4)?,
        location: Location::decode_lenient(&location),
        confidence: row.get(6)?,
        trust: row.get(7)?,
        modality: text_as(row, 8, |s| s.parse::<Modality>())?,
        status: text_as(row, 9, |s| s.parse::<ReviewStatus>())?,
        claimed_time_start: row.get(10)?,
        claimed_time_end: row.get(11)?,
        claimed_time_text: row.get(12)?,
        claimed_geo_region: row.get(13)?,
        claimed_geo_text: row.get(14)?,
        claimed_by,
        created_at: timestamp(row, 16)?,
    })
}

/// Stored form of a target id
pub(crate) fn target_bytes(target: Target) -> [u8; 16] {
    target.raw_id().to_be_bytes()
}

/// SQLite LIMIT value for a caller-supplied bound
pub(crate) fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
