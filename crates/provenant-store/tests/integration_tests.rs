//! Integration tests for provenant-store
//!
//! These tests cover the node, edge and provenance lifecycle end to end.

use provenant_domain::{
    EdgeType, Location, Modality, NewEdge, NewNode, NewProvenance, NodeId, NodeType, Properties,
    ReviewStatus, Target, ViewResolver, ViewStrategy,
};
use provenant_store::{
    AtomicGraph, GraphAudit, GraphStore, NodeDeletePolicy, ProvenanceLedger, SqliteStore,
    StoreConfig, StoreError,
};

fn store_with_document() -> (SqliteStore, NodeId) {
    let mut store = SqliteStore::in_memory().unwrap();
    let doc = store
        .create_node(NewNode::new(NodeType::DOCUMENT, "Pride and Prejudice"))
        .unwrap();
    (store, doc)
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::in_memory();
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_create_and_get_node() {
    let (mut store, _) = store_with_document();
    let props = Properties::new()
        .with("description", "Second Bennet daughter")
        .with("aliases", vec!["Lizzy", "Eliza"]);

    let id = store
        .create_node(NewNode::new(NodeType::PERSON, "Elizabeth Bennet").with_properties(props))
        .unwrap();
    let node = store.get_node(id).unwrap();

    assert_eq!(node.id, id);
    assert_eq!(node.node_type, NodeType::PERSON);
    assert_eq!(node.label, "Elizabeth Bennet");
    let aliases: Vec<String> = node.get_property("aliases", Vec::new());
    assert_eq!(aliases, vec!["Lizzy", "Eliza"]);
    assert_eq!(node.get_property("missing", 5i64), 5);
}

#[test]
fn test_unknown_node_type_is_accepted() {
    let (mut store, _) = store_with_document();
    let kind = NodeType::new("Ship Voyage").unwrap();
    let id = store.create_node(NewNode::new(kind, "HMS Laconia")).unwrap();
    let node = store.get_node(id).unwrap();
    assert_eq!(node.node_type.as_str(), "ship_voyage");
    assert!(!node.node_type.is_known());
}

#[test]
fn test_empty_label_rejected() {
    let (mut store, _) = store_with_document();
    let err = store
        .create_node(NewNode::new(NodeType::PERSON, "   "))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
}

#[test]
fn test_missing_ids_are_not_found() {
    let (store, _) = store_with_document();
    assert!(store.get_node(NodeId::new()).unwrap_err().is_not_found());
    assert!(store
        .get_edge(provenant_domain::EdgeId::new())
        .unwrap_err()
        .is_not_found());
    assert!(store
        .get_provenance(provenant_domain::ProvenanceId::new())
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_edge_requires_existing_endpoints() {
    let (mut store, doc) = store_with_document();
    let ghost = NodeId::new();

    let err = store
        .create_edge(NewEdge::new(EdgeType::RELATED_TO, doc, ghost))
        .unwrap_err();
    match err {
        StoreError::Referential {
            edge_endpoint,
            node_id,
        } => {
            assert_eq!(edge_endpoint, "target");
            assert_eq!(node_id, ghost.to_string());
        }
        other => panic!("expected referential error, got {other}"),
    }

    let err = store
        .create_edge(NewEdge::new(EdgeType::RELATED_TO, ghost, doc))
        .unwrap_err();
    assert!(err.is_referential());
    assert_eq!(store.count_edges().unwrap(), 0);
}

#[test]
fn test_negated_edge_round_trip() {
    let (mut store, _) = store_with_document();
    let a = store.create_node(NewNode::new(NodeType::PERSON, "Wickham")).unwrap();
    let b = store.create_node(NewNode::new(NodeType::PERSON, "Darcy")).unwrap();
    let id = store
        .create_edge(
            NewEdge::new(EdgeType::RELATED_TO, a, b)
                .with_properties(Properties::new().with("description", "godson of Darcy's father"))
                .negated(),
        )
        .unwrap();

    let edge = store.get_edge(id).unwrap();
    assert!(edge.is_negated);
    assert_eq!(edge.source_node, a);
    assert_eq!(edge.target_node, b);
    assert_eq!(
        edge.get_property("description", String::new()),
        "godson of Darcy's father"
    );
}

#[test]
fn test_provenance_round_trip() {
    let (mut store, doc) = store_with_document();
    let event = store
        .create_node(NewNode::new(NodeType::EVENT, "Netherfield ball"))
        .unwrap();
    let reviewer = store
        .create_node(NewNode::new(NodeType::REVIEW_ACTION, "review"))
        .unwrap();

    let id = store
        .create_provenance(
            Target::Node(event),
            NewProvenance::new(doc)
                .excerpt("the ball at Netherfield")
                .location(Location::page(88).with_chapter("Chapter 18"))
                .confidence(0.8)
                .trust(0.9)
                .modality(Modality::Asserted)
                .claimed_time(Some(-5_000_000_000), None)
                .claimed_time_text("Tuesday, 26 November")
                .claimed_geo(Some("hertfordshire".into()), Some("Netherfield".into()))
                .claimed_by(reviewer),
        )
        .unwrap();

    let record = store.get_provenance(id).unwrap();
    assert_eq!(record.target, Target::Node(event));
    assert_eq!(record.source_id, doc);
    assert_eq!(record.location.page, Some(88));
    assert_eq!(record.location.chapter.as_deref(), Some("Chapter 18"));
    assert_eq!(record.status, ReviewStatus::Pending);
    assert!((record.effective_confidence() - 0.72).abs() < 1e-9);
    assert_eq!(record.claimed_time_start, Some(-5_000_000_000));
    assert_eq!(record.time_range(), Some((Some(-5_000_000_000), None)));
    assert!(record.has_geo_info());
    assert_eq!(record.claimed_by, Some(reviewer));
}

#[test]
fn test_provenance_listed_in_insertion_order() {
    let (mut store, doc) = store_with_document();
    let node = store.create_node(NewNode::new(NodeType::PLACE, "Longbourn")).unwrap();

    let ids: Vec<_> = (0..5)
        .map(|i| {
            store
                .create_provenance(
                    Target::Node(node),
                    NewProvenance::new(doc).confidence(0.1 * i as f64),
                )
                .unwrap()
        })
        .collect();

    let listed: Vec<_> = store
        .list_provenance_by_target(Target::Node(node))
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(listed, ids);
}

#[test]
fn test_list_nodes_by_source_joins_through_provenance() {
    let (mut store, doc) = store_with_document();
    let other_doc = store
        .create_node(NewNode::new(NodeType::DOCUMENT, "Emma"))
        .unwrap();

    let (jane, _) = store
        .create_node_with_provenance(
            NewNode::new(NodeType::PERSON, "Jane Bennet"),
            NewProvenance::new(doc),
        )
        .unwrap();
    // Two records from the same source must not duplicate the node
    store
        .create_provenance(Target::Node(jane), NewProvenance::new(doc))
        .unwrap();
    store
        .create_node_with_provenance(
            NewNode::new(NodeType::PERSON, "Emma Woodhouse"),
            NewProvenance::new(other_doc),
        )
        .unwrap();
    store
        .create_node(NewNode::new(NodeType::PERSON, "No evidence"))
        .unwrap();

    let nodes = store.list_nodes_by_source(doc).unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].id, jane);
}

#[test]
fn test_list_by_type_respects_limit_and_order() {
    let (mut store, _) = store_with_document();
    let ids: Vec<_> = ["Kitty", "Lydia", "Mary"]
        .iter()
        .map(|name| store.create_node(NewNode::new(NodeType::PERSON, *name)).unwrap())
        .collect();

    let two = store.list_nodes_by_type(&NodeType::PERSON, 2).unwrap();
    assert_eq!(two.len(), 2);
    assert_eq!(two[0].id, ids[0]);
    assert_eq!(two[1].id, ids[1]);
    assert!(store.list_nodes_by_type(&NodeType::PLACE, 10).unwrap().is_empty());
}

#[test]
fn test_edges_by_type_source_and_node() {
    let (mut store, doc) = store_with_document();
    let a = store.create_node(NewNode::new(NodeType::PERSON, "Bingley")).unwrap();
    let b = store.create_node(NewNode::new(NodeType::PERSON, "Jane")).unwrap();
    let c = store.create_node(NewNode::new(NodeType::PLACE, "Netherfield")).unwrap();

    let (courts, _) = store
        .create_edge_with_provenance(
            NewEdge::new(EdgeType::RELATED_TO, a, b),
            NewProvenance::new(doc),
        )
        .unwrap();
    let lives = store
        .create_edge(NewEdge::new(EdgeType::LOCATED_AT, a, c))
        .unwrap();

    let by_type = store.list_edges_by_type(&EdgeType::LOCATED_AT, 10).unwrap();
    assert_eq!(by_type.iter().map(|e| e.id).collect::<Vec<_>>(), vec![lives]);

    let by_source = store.list_edges_by_source(doc).unwrap();
    assert_eq!(by_source.iter().map(|e| e.id).collect::<Vec<_>>(), vec![courts]);

    let touching_a = store.list_edges_for_node(a).unwrap();
    assert_eq!(touching_a.len(), 2);
    assert_eq!(store.list_edges_for_node(b).unwrap()[0].id, courts);
}

#[test]
fn test_delete_node_cascades_provenance_and_edges() {
    let (mut store, doc) = store_with_document();
    let (a, _) = store
        .create_node_with_provenance(NewNode::new(NodeType::PERSON, "Lydia"), NewProvenance::new(doc))
        .unwrap();
    let (b, _) = store
        .create_node_with_provenance(NewNode::new(NodeType::PERSON, "Wickham"), NewProvenance::new(doc))
        .unwrap();
    let (edge, _) = store
        .create_edge_with_provenance(NewEdge::new(EdgeType::RELATED_TO, a, b), NewProvenance::new(doc))
        .unwrap();
    store
        .create_provenance(Target::Node(a), NewProvenance::new(doc).modality(Modality::Denied))
        .unwrap();

    store.delete_node(a).unwrap();

    assert!(store.get_node(a).unwrap_err().is_not_found());
    assert!(store.list_provenance_by_target(Target::Node(a)).unwrap().is_empty());
    assert!(store.get_edge(edge).unwrap_err().is_not_found());
    assert!(store.list_provenance_by_target(Target::Edge(edge)).unwrap().is_empty());
    // The other endpoint and its evidence survive
    assert_eq!(store.list_provenance_by_target(Target::Node(b)).unwrap().len(), 1);
    assert!(store.find_dangling_edges(10).unwrap().is_empty());
}

#[test]
fn test_restrict_policy_refuses_referenced_node() {
    let config = StoreConfig {
        node_delete_policy: NodeDeletePolicy::Restrict,
        ..StoreConfig::in_memory()
    };
    let mut store = SqliteStore::with_config(config).unwrap();
    let a = store.create_node(NewNode::new(NodeType::PERSON, "Collins")).unwrap();
    let b = store.create_node(NewNode::new(NodeType::PERSON, "Charlotte")).unwrap();
    let edge = store.create_edge(NewEdge::new(EdgeType::RELATED_TO, a, b)).unwrap();

    let err = store.delete_node(a).unwrap_err();
    assert!(err.is_referential());
    assert!(store.get_node(a).is_ok());

    store.delete_edge(edge).unwrap();
    store.delete_node(a).unwrap();
    assert_eq!(store.count_nodes().unwrap(), 1);
}

#[test]
fn test_delete_edge_cascades_provenance() {
    let (mut store, doc) = store_with_document();
    let a = store.create_node(NewNode::new(NodeType::PERSON, "Lady Catherine")).unwrap();
    let (edge, prov) = store
        .create_edge_with_provenance(NewEdge::new(EdgeType::RELATED_TO, a, doc), NewProvenance::new(doc))
        .unwrap();

    store.delete_edge(edge).unwrap();
    assert!(store.get_provenance(prov).unwrap_err().is_not_found());
    assert!(store.delete_edge(edge).unwrap_err().is_not_found());
    assert!(store.get_node(a).is_ok());
}

#[test]
fn test_status_by_target_is_idempotent_and_modality_blind() {
    let (mut store, doc) = store_with_document();
    let node = store.create_node(NewNode::new(NodeType::EVENT, "Proposal at Hunsford")).unwrap();
    let other = store.create_node(NewNode::new(NodeType::EVENT, "Second proposal")).unwrap();
    for modality in [Modality::Asserted, Modality::Denied, Modality::Hypothetical] {
        store
            .create_provenance(Target::Node(node), NewProvenance::new(doc).modality(modality))
            .unwrap();
    }
    store
        .create_provenance(Target::Node(other), NewProvenance::new(doc))
        .unwrap();

    let first = store
        .update_provenance_status_by_target(Target::Node(node), ReviewStatus::Approved)
        .unwrap();
    let second = store
        .update_provenance_status_by_target(Target::Node(node), ReviewStatus::Approved)
        .unwrap();
    assert_eq!(first, 3);
    assert_eq!(second, 3);

    let records = store.list_provenance_by_target(Target::Node(node)).unwrap();
    assert!(records.iter().all(|r| r.status == ReviewStatus::Approved));
    let untouched = store.list_provenance_by_target(Target::Node(other)).unwrap();
    assert_eq!(untouched[0].status, ReviewStatus::Pending);
}

#[test]
fn test_single_status_transition_last_write_wins() {
    let (mut store, doc) = store_with_document();
    let node = store.create_node(NewNode::new(NodeType::PERSON, "Mr Bennet")).unwrap();
    let id = store
        .create_provenance(Target::Node(node), NewProvenance::new(doc))
        .unwrap();

    store.update_provenance_status(id, ReviewStatus::Rejected).unwrap();
    store.update_provenance_status(id, ReviewStatus::Approved).unwrap();
    assert_eq!(store.get_provenance(id).unwrap().status, ReviewStatus::Approved);

    store.delete_provenance(id).unwrap();
    assert!(store
        .update_provenance_status(id, ReviewStatus::Pending)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_update_and_edit_node() {
    let (mut store, doc) = store_with_document();
    let (node, prov) = store
        .create_node_with_provenance(
            NewNode::new(NodeType::PERSON, "Mrs Bennett"),
            NewProvenance::new(doc),
        )
        .unwrap();

    store
        .update_node(node, "Mrs Bennet", Properties::new().with("nerves", true))
        .unwrap();
    let updated = store.get_node(node).unwrap();
    assert_eq!(updated.label, "Mrs Bennet");
    assert!(updated.get_property("nerves", false));
    assert!(updated.updated_at >= updated.created_at);
    assert_eq!(store.get_provenance(prov).unwrap().status, ReviewStatus::Pending);

    let restamped = store
        .edit_node(node, "Mrs Bennet", Properties::new().with("nerves", "poor"))
        .unwrap();
    assert_eq!(restamped, 1);
    assert_eq!(store.get_provenance(prov).unwrap().status, ReviewStatus::Edited);

    assert!(matches!(
        store.edit_node(node, "", Properties::new()),
        Err(StoreError::Validation(_))
    ));
    // Failed edit leaves the earlier one in place
    assert_eq!(store.get_node(node).unwrap().get_property("nerves", String::new()), "poor");
    assert!(store
        .update_node(NodeId::new(), "x", Properties::new())
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_update_edge_properties() {
    let (mut store, _) = store_with_document();
    let a = store.create_node(NewNode::new(NodeType::PERSON, "Darcy")).unwrap();
    let b = store.create_node(NewNode::new(NodeType::PLACE, "Pemberley")).unwrap();
    let edge = store.create_edge(NewEdge::new(EdgeType::LOCATED_AT, a, b)).unwrap();

    store
        .update_edge_properties(edge, Properties::new().with("role", "owner"))
        .unwrap();
    assert_eq!(store.get_edge(edge).unwrap().get_property("role", String::new()), "owner");
}

#[test]
fn test_get_with_provenance() {
    let (mut store, doc) = store_with_document();
    let (node, prov) = store
        .create_node_with_provenance(NewNode::new(NodeType::OBJECT, "Letter"), NewProvenance::new(doc))
        .unwrap();
    let (fetched, records) = store.get_node_with_provenance(node).unwrap();
    assert_eq!(fetched.label, "Letter");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, prov);
}

#[test]
fn test_find_document_by_legacy_source() {
    let mut store = SqliteStore::in_memory().unwrap();
    let doc = store
        .create_node(
            NewNode::new(NodeType::DOCUMENT, "Mansfield Park")
                .with_properties(Properties::new().with("source_id", "legacy-42")),
        )
        .unwrap();

    let found = store.find_document_by_legacy_source("legacy-42").unwrap();
    assert_eq!(found.map(|n| n.id), Some(doc));
    assert!(store.find_document_by_legacy_source("legacy-7").unwrap().is_none());
}

#[test]
fn test_review_progress() {
    let (mut store, doc) = store_with_document();
    let (_, event_prov) = store
        .create_node_with_provenance(NewNode::new(NodeType::EVENT, "Elopement"), NewProvenance::new(doc))
        .unwrap();
    store
        .create_node_with_provenance(NewNode::new(NodeType::ATTRIBUTE, "Proud"), NewProvenance::new(doc))
        .unwrap();
    let (person, _) = store
        .create_node_with_provenance(NewNode::new(NodeType::PERSON, "Lydia"), NewProvenance::new(doc))
        .unwrap();
    store
        .create_node_with_provenance(NewNode::new(NodeType::CHUNK, "Chunk 0"), NewProvenance::new(doc))
        .unwrap();

    store.update_provenance_status(event_prov, ReviewStatus::Approved).unwrap();
    store
        .update_provenance_status_by_target(Target::Node(person), ReviewStatus::Rejected)
        .unwrap();

    let progress = store.review_progress(doc).unwrap();
    assert_eq!(progress.claims.total, 2);
    assert_eq!(progress.claims.approved, 1);
    assert_eq!(progress.claims.pending, 1);
    assert_eq!(progress.entities.total, 1);
    assert_eq!(progress.entities.rejected, 1);
    assert_eq!(progress.total_items(), 3);
    assert_eq!(progress.total_reviewed(), 2);
}

#[test]
fn test_orphan_audit() {
    let (mut store, doc) = store_with_document();
    store
        .create_node_with_provenance(NewNode::new(NodeType::PERSON, "Georgiana"), NewProvenance::new(doc))
        .unwrap();
    let orphan = store.create_node(NewNode::new(NodeType::PERSON, "Anne de Bourgh")).unwrap();
    let edge = store
        .create_edge(NewEdge::new(EdgeType::RELATED_TO, orphan, doc))
        .unwrap();

    let nodes = store.find_orphaned_nodes(10).unwrap();
    let node_ids: Vec<_> = nodes.iter().map(|n| n.id).collect();
    // The document itself has no provenance in this fixture
    assert_eq!(node_ids, vec![doc, orphan]);
    assert_eq!(store.find_orphaned_nodes(1).unwrap().len(), 1);

    let edges = store.find_orphaned_edges(10).unwrap();
    assert_eq!(edges.iter().map(|e| e.id).collect::<Vec<_>>(), vec![edge]);

    let counts = store.counts().unwrap();
    assert_eq!((counts.nodes, counts.edges, counts.provenance), (3, 1, 1));
    assert!(store.find_corrupt_payloads(10).unwrap().is_empty());
}

#[test]
fn test_resolve_over_stored_provenance() {
    let (mut store, doc) = store_with_document();
    let node = store.create_node(NewNode::new(NodeType::EVENT, "Visit to Pemberley")).unwrap();
    let low = store
        .create_provenance(Target::Node(node), NewProvenance::new(doc).confidence(0.9).trust(0.5))
        .unwrap();
    let high = store
        .create_provenance(Target::Node(node), NewProvenance::new(doc).confidence(0.6).trust(1.0))
        .unwrap();

    let records = store.list_provenance_by_target(Target::Node(node)).unwrap();
    let resolver = ViewResolver::new();
    assert_eq!(resolver.resolve(&records, ViewStrategy::TrustWeighted).id, high);
    assert_eq!(resolver.resolve(&records, ViewStrategy::Conflict).id, low);

    store.update_provenance_status(low, ReviewStatus::Approved).unwrap();
    let records = store.list_provenance_by_target(Target::Node(node)).unwrap();
    assert_eq!(resolver.resolve(&records, ViewStrategy::HumanDecided).id, low);
}

#[test]
fn test_resolve_identity_and_classes() {
    let (mut store, doc) = store_with_document();
    let lizzy = store.create_node(NewNode::new(NodeType::PERSON, "Lizzy")).unwrap();
    let eliza = store.create_node(NewNode::new(NodeType::PERSON, "Eliza")).unwrap();
    let elizabeth = store.create_node(NewNode::new(NodeType::PERSON, "Elizabeth")).unwrap();
    let stranger = store.create_node(NewNode::new(NodeType::PERSON, "Mrs Younge")).unwrap();

    store
        .create_edge(NewEdge::new(EdgeType::SAME_AS, lizzy, stranger).negated())
        .unwrap();
    store
        .create_edge_with_provenance(
            NewEdge::new(EdgeType::SAME_AS, lizzy, eliza),
            NewProvenance::new(doc).confidence(0.4),
        )
        .unwrap();
    store
        .create_edge_with_provenance(
            NewEdge::new(EdgeType::SAME_AS, lizzy, elizabeth),
            NewProvenance::new(doc).confidence(0.8),
        )
        .unwrap();
    store
        .create_edge(NewEdge::new(EdgeType::SAME_AS, eliza, elizabeth))
        .unwrap();

    let resolver = ViewResolver::new();
    assert_eq!(
        resolver.resolve_identity(&store, lizzy, ViewStrategy::SingleSource).unwrap(),
        eliza
    );
    assert_eq!(
        resolver.resolve_identity(&store, lizzy, ViewStrategy::TrustWeighted).unwrap(),
        elizabeth
    );
    assert_eq!(
        resolver.resolve_identity(&store, stranger, ViewStrategy::TrustWeighted).unwrap(),
        stranger
    );
    // Single hop: eliza only links onward to elizabeth
    assert_eq!(
        resolver.resolve_identity(&store, eliza, ViewStrategy::HumanDecided).unwrap(),
        elizabeth
    );

    let classes = resolver.equivalence_class(&store, eliza).unwrap();
    assert!(classes.same_class(lizzy, elizabeth));
    assert!(!classes.same_class(lizzy, stranger));
    let expected = [lizzy, eliza, elizabeth].into_iter().min().unwrap();
    assert_eq!(resolver.canonical(&store, elizabeth).unwrap(), expected);
    assert_eq!(resolver.canonical(&store, stranger).unwrap(), stranger);
}

#[test]
fn test_identity_ignores_unsupported_candidates() {
    let (mut store, doc) = store_with_document();
    let jane = store.create_node(NewNode::new(NodeType::PERSON, "Jane")).unwrap();
    let fairfax = store.create_node(NewNode::new(NodeType::PERSON, "Jane Fairfax")).unwrap();
    let bennet = store.create_node(NewNode::new(NodeType::PERSON, "Jane Bennet")).unwrap();
    let rumour = store.create_node(NewNode::new(NodeType::PERSON, "Miss J.")).unwrap();

    store
        .create_edge_with_provenance(
            NewEdge::new(EdgeType::SAME_AS, jane, fairfax),
            NewProvenance::new(doc).confidence(0.8),
        )
        .unwrap();
    store
        .create_edge_with_provenance(
            NewEdge::new(EdgeType::SAME_AS, jane, bennet),
            NewProvenance::new(doc).confidence(0.5),
        )
        .unwrap();
    store
        .create_edge(NewEdge::new(EdgeType::SAME_AS, jane, rumour))
        .unwrap();

    let resolver = ViewResolver::new();
    assert_eq!(
        resolver.resolve_identity(&store, jane, ViewStrategy::Conflict).unwrap(),
        bennet
    );
    assert_eq!(
        resolver.resolve_identity(&store, jane, ViewStrategy::TrustWeighted).unwrap(),
        fairfax
    );

    // With no supported candidate the first edge wins
    let emma = store.create_node(NewNode::new(NodeType::PERSON, "Emma")).unwrap();
    let woodhouse = store.create_node(NewNode::new(NodeType::PERSON, "Emma Woodhouse")).unwrap();
    store
        .create_edge(NewEdge::new(EdgeType::SAME_AS, emma, woodhouse))
        .unwrap();
    store
        .create_edge(NewEdge::new(EdgeType::SAME_AS, emma, rumour))
        .unwrap();
    assert_eq!(
        resolver.resolve_identity(&store, emma, ViewStrategy::Conflict).unwrap(),
        woodhouse
    );
}

#[test]
fn test_file_backed_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.db");

    let id = {
        let mut store = SqliteStore::new(&path).unwrap();
        store
            .create_node(NewNode::new(NodeType::DOCUMENT, "Northanger Abbey"))
            .unwrap()
    };

    let store = SqliteStore::with_config(StoreConfig::at(&path)).unwrap();
    assert_eq!(store.get_node(id).unwrap().label, "Northanger Abbey");
    assert!(store.config().wal);
}
