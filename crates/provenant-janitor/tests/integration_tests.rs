//! Integration tests for provenant-janitor against file-backed databases

use provenant_domain::{EdgeType, NewEdge, NewNode, NewProvenance, NodeId, NodeType};
use provenant_janitor::{Janitor, JanitorConfig, JanitorWorker};
use provenant_store::{AtomicGraph, GraphAudit, GraphStore, SqliteStore, StoreConfig};
use rusqlite::{params, Connection};
use std::path::Path;

struct Seeded {
    elizabeth: NodeId,
    darcy: NodeId,
}

fn seed(path: &Path) -> Seeded {
    let mut store = SqliteStore::new(path).unwrap();
    let doc = store
        .create_node(NewNode::new(NodeType::DOCUMENT, "Pride and Prejudice"))
        .unwrap();
    let (elizabeth, _) = store
        .create_node_with_provenance(
            NewNode::new(NodeType::PERSON, "Elizabeth Bennet"),
            NewProvenance::new(doc),
        )
        .unwrap();
    let (darcy, _) = store
        .create_node_with_provenance(
            NewNode::new(NodeType::PERSON, "Fitzwilliam Darcy"),
            NewProvenance::new(doc),
        )
        .unwrap();
    store
        .create_edge_with_provenance(
            NewEdge::new(EdgeType::RELATED_TO, darcy, elizabeth),
            NewProvenance::new(doc),
        )
        .unwrap();
    Seeded { elizabeth, darcy }
}

#[test]
fn test_clean_graph_reports_only_unattributed_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.db");
    seed(&path);

    let store = SqliteStore::new(&path).unwrap();
    let report = Janitor::default_config().sweep(&store).unwrap();

    assert_eq!(report.orphaned_nodes.len(), 1);
    assert!(report.orphaned_edges.is_empty());
    assert!(report.dangling_edges.is_empty());
    assert!(report.corrupt_payloads.is_empty());
    assert_eq!(report.counts.nodes, 3);
    assert_eq!(report.counts.edges, 1);
    assert_eq!(report.counts.provenance, 3);
}

#[test]
fn test_dangling_edge_and_corrupt_payload_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.db");
    let seeded = seed(&path);

    // Damage the file the way an external tool with foreign keys off could
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch("PRAGMA foreign_keys = OFF;").unwrap();
        conn.execute(
            "DELETE FROM nodes WHERE id = ?1",
            params![seeded.elizabeth.to_bytes()],
        )
        .unwrap();
        conn.execute(
            "UPDATE nodes SET properties = '{not json' WHERE id = ?1",
            params![seeded.darcy.to_bytes()],
        )
        .unwrap();
    }

    let config = StoreConfig {
        enforce_foreign_keys: false,
        ..StoreConfig::at(&path)
    };
    let store = SqliteStore::with_config(config).unwrap();
    let report = Janitor::default_config().sweep(&store).unwrap();

    assert_eq!(report.dangling_edges.len(), 1);
    assert_eq!(report.corrupt_payloads.len(), 1);
    assert_eq!(report.corrupt_payloads[0].field, "properties");
    assert!(report.corrupt_payloads[0].owner.starts_with("nodes:"));

    // Display paths still read the damaged node
    let darcy = store.get_node(seeded.darcy).unwrap();
    assert!(darcy.properties.is_empty());
}

#[test]
fn test_lenient_preset_skips_integrity_scans() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.db");
    let seeded = seed(&path);
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute(
            "UPDATE nodes SET properties = '[]' WHERE id = ?1",
            params![seeded.darcy.to_bytes()],
        )
        .unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    let report = Janitor::new(JanitorConfig::lenient()).sweep(&store).unwrap();

    assert!(report.corrupt_payloads.is_empty());
    assert!(report.dangling_edges.is_empty());
    assert_eq!(report.orphaned_nodes.len(), 1);
}

#[test]
fn test_report_serializes() {
    let store = SqliteStore::in_memory().unwrap();
    let report = Janitor::default_config().sweep(&store).unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["counts"]["nodes"], 0);
    assert!(json["orphaned_nodes"].as_array().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_worker_sees_new_orphans_between_cycles() {
    let mut store = SqliteStore::in_memory().unwrap();
    store
        .create_node(NewNode::new(NodeType::PERSON, "Mr. Collins"))
        .unwrap();

    let config = JanitorConfig {
        sweep_interval_minutes: 1,
        ..Default::default()
    };
    let mut worker = JanitorWorker::new(config);

    let mut store = worker.run_cycles(store, 1).await.unwrap();
    assert_eq!(worker.metrics().orphaned_nodes, 1);

    store
        .create_node(NewNode::new(NodeType::PERSON, "Charlotte Lucas"))
        .unwrap();
    let store = worker.run_cycles(store, 1).await.unwrap();

    assert_eq!(worker.metrics().sweep_count, 2);
    assert_eq!(worker.metrics().orphaned_nodes, 3);
    assert_eq!(store.counts().unwrap().nodes, 2);
}
