use crossbeam_channel::RecvTimeoutError;
use detective_core::{NodeId, Record};
use detective_events::{Event, EventBus, QueryOutcome};
use detective_graph::GraphView;
use detective_storage::testing::FakeDatabase;
use detective_storage::{
    DatabaseWorker, EDGE_QUERY, GraphLoader, LoadError, LoadOutcome, NODE_QUERY, PING_QUERY,
    StorageError, WorkerError,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn node(id: &str, label: &str, flags: serde_json::Value) -> Record {
    let mut props = json!({"name": id.to_uppercase()});
    if let (Some(props), Some(flags)) = (props.as_object_mut(), flags.as_object()) {
        props.extend(flags.clone());
    }
    Record::from_json(json!({"labels": [label], "props": props, "id": id}))
}

fn edge(source: &str, rel: &str, target: &str) -> Record {
    Record::from_json(json!({
        "source": source, "relationship": rel, "target": target, "props": {"graph_1": true}
    }))
}

fn case_db() -> FakeDatabase {
    FakeDatabase::new().with_graph(
        vec![
            node("alice", "Suspect", json!({"graph_1": true})),
            node("bob", "Suspect", json!({"graph_1": false})),
            node("victim", "Victim", json!({})),
            node("hotel", "Location", json!({})),
        ],
        vec![
            edge("alice", "WAS_AT", "hotel"),
            edge("bob", "WAS_AT", "hotel"),
            edge("alice", "CLOSE_FRIEND_OF", "victim"),
        ],
    )
}

#[test]
fn filtered_out_endpoint_drops_the_edge() {
    let loader = GraphLoader::new(Arc::new(case_db()));
    let graph = loader.fetch(2).expect("graph loads");

    let ids: Vec<&str> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["alice", "victim", "hotel"]);
    assert_eq!(graph.edges.len(), 2);
    assert!(graph.edges.iter().all(|e| e.source != NodeId::new("bob")));
}

#[test]
fn load_into_is_idempotent_per_level() {
    let db = Arc::new(case_db());
    let loader = GraphLoader::new(db.clone());
    let mut view = GraphView::default();

    assert_eq!(
        loader.load_into(&mut view, 2),
        LoadOutcome::Loaded { nodes: 3, edges: 2 }
    );
    assert_eq!(db.call_count(), 2);
    assert_eq!(loader.load_into(&mut view, 2), LoadOutcome::AlreadyLoaded);
    assert_eq!(db.call_count(), 2);
}

#[test]
fn failed_load_keeps_previous_graph() {
    let db = Arc::new(case_db());
    let loader = GraphLoader::new(db.clone());
    let mut view = GraphView::default();
    loader.load_into(&mut view, 2);

    let broken = Arc::new(
        FakeDatabase::new()
            .with_error(NODE_QUERY, StorageError::Connection("refused".into()))
            .with_rows(EDGE_QUERY, Vec::new()),
    );
    let outcome = GraphLoader::new(broken).load_into(&mut view, 3);

    assert_eq!(
        outcome,
        LoadOutcome::Failed(LoadError::Database(StorageError::Connection(
            "refused".into()
        )))
    );
    assert_eq!(view.level(), Some(2));
    assert_eq!(view.model().node_count(), 3);
}

#[test]
fn worker_publishes_results_in_request_order() {
    let answer = vec![Record::from_json(json!({"suspect": "ALICE"}))];
    let db = Arc::new(
        case_db()
            .with_rows("MATCH user", answer.clone())
            .with_rows("MATCH truth", answer),
    );
    let bus = EventBus::new();
    let mut worker = DatabaseWorker::spawn(db, bus.clone()).expect("worker thread");

    assert!(worker.load_graph(2));
    assert!(worker.evaluate(2, "MATCH user".into(), "MATCH truth".into()));
    assert!(worker.evaluate(2, "MATCH (n) SET n.x = 1".into(), "MATCH truth".into()));

    let rx = bus.receiver();
    let timeout = Duration::from_secs(5);
    match rx.recv_timeout(timeout).expect("graph event") {
        Event::GraphFetched { level, nodes, edges } => {
            assert_eq!(level, 2);
            assert_eq!(nodes.len(), 3);
            assert_eq!(edges.len(), 2);
        }
        other => panic!("expected GraphFetched, got {other:?}"),
    }
    match rx.recv_timeout(timeout).expect("evaluation event") {
        Event::QueryEvaluated { outcome, .. } => assert!(outcome.is_match()),
        other => panic!("expected QueryEvaluated, got {other:?}"),
    }
    match rx.recv_timeout(timeout).expect("rejection event") {
        Event::QueryEvaluated { outcome, .. } => {
            assert!(matches!(outcome, QueryOutcome::Rejected { .. }))
        }
        other => panic!("expected QueryEvaluated, got {other:?}"),
    }

    worker.shutdown();
    assert!(!worker.load_graph(3));
    assert_eq!(
        rx.recv_timeout(Duration::from_millis(50)).err(),
        Some(RecvTimeoutError::Timeout)
    );
}

#[test]
fn unreachable_database_stops_the_worker_before_it_starts() {
    let db = Arc::new(FakeDatabase::new().with_error(
        PING_QUERY,
        StorageError::Connection("connection refused".into()),
    ));
    let bus = EventBus::new();

    match DatabaseWorker::connect(db.clone(), bus.clone()) {
        Err(WorkerError::Unreachable(StorageError::Connection(message))) => {
            assert_eq!(message, "connection refused");
        }
        Err(other) => panic!("expected an unreachable database, got {other}"),
        Ok(_) => panic!("worker started without a database"),
    }
    assert_eq!(db.executed(), vec![PING_QUERY.to_string()]);
    assert!(bus.drain().is_empty());
}

#[test]
fn reachable_database_starts_the_worker() {
    let db = Arc::new(case_db().with_rows(PING_QUERY, vec![Record::from_json(json!({"ok": 1}))]));
    let bus = EventBus::new();
    let mut worker = DatabaseWorker::connect(db.clone(), bus.clone()).expect("database answers");

    assert!(worker.load_graph(2));
    match bus.receiver().recv_timeout(Duration::from_secs(5)).expect("graph event") {
        Event::GraphFetched { level, .. } => assert_eq!(level, 2),
        other => panic!("expected GraphFetched, got {other:?}"),
    }
    worker.shutdown();
    assert_eq!(db.executed()[0], PING_QUERY);
}
