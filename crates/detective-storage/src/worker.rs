use crate::{GraphDatabase, GraphLoader, QueryEvaluator, StorageError};
use crossbeam_channel::{Receiver, Sender, unbounded};
use detective_events::{Event, EventBus, QueryOutcome};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("{0}")]
    Unreachable(#[from] StorageError),
    #[error("Failed to start the database worker: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbRequest {
    LoadGraph {
        level: u32,
    },
    Evaluate {
        level: u32,
        query: String,
        ground_truth: String,
    },
    Shutdown,
}

/// Runs every database call on one background thread, in request order.
///
/// Results come back as [`Event`]s on the bus; the UI thread drains them and
/// stays the only writer of graph and interaction state.
pub struct DatabaseWorker {
    requests: Sender<DbRequest>,
    handle: Option<JoinHandle<()>>,
}

impl DatabaseWorker {
    /// Check the database answers, then start the worker on it.
    pub fn connect(db: Arc<dyn GraphDatabase>, bus: EventBus) -> Result<Self, WorkerError> {
        db.verify_connectivity()?;
        tracing::info!("Database connection verified");
        Ok(Self::spawn(db, bus)?)
    }

    pub fn spawn(db: Arc<dyn GraphDatabase>, bus: EventBus) -> std::io::Result<Self> {
        let (requests, inbox) = unbounded();
        let handle = std::thread::Builder::new()
            .name("database-worker".to_string())
            .spawn(move || run(db, inbox, bus))?;
        Ok(Self {
            requests,
            handle: Some(handle),
        })
    }

    /// Returns false when the worker has already stopped.
    pub fn request(&self, request: DbRequest) -> bool {
        if self.requests.send(request).is_err() {
            tracing::warn!("Database worker is gone, request dropped");
            return false;
        }
        true
    }

    pub fn load_graph(&self, level: u32) -> bool {
        self.request(DbRequest::LoadGraph { level })
    }

    pub fn evaluate(&self, level: u32, query: String, ground_truth: String) -> bool {
        self.request(DbRequest::Evaluate {
            level,
            query,
            ground_truth,
        })
    }

    pub fn shutdown(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let _ = self.requests.send(DbRequest::Shutdown);
        if handle.join().is_err() {
            tracing::error!("Database worker panicked");
        }
    }
}

impl Drop for DatabaseWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run(db: Arc<dyn GraphDatabase>, inbox: Receiver<DbRequest>, bus: EventBus) {
    tracing::debug!("Database worker started");
    let loader = GraphLoader::new(db.clone());
    let evaluator = QueryEvaluator::new(db);

    while let Ok(request) = inbox.recv() {
        match request {
            DbRequest::LoadGraph { level } => match loader.fetch(level) {
                Ok(graph) => bus.publish(Event::GraphFetched {
                    level,
                    nodes: graph.nodes,
                    edges: graph.edges,
                }),
                Err(err) => {
                    tracing::error!("Failed to load graph for level {}: {}", level, err);
                    bus.publish(Event::GraphFetchFailed {
                        level,
                        message: err.to_string(),
                    });
                }
            },
            DbRequest::Evaluate {
                level,
                query,
                ground_truth,
            } => {
                let outcome: QueryOutcome = evaluator.evaluate(&query, &ground_truth).into();
                bus.publish(Event::QueryEvaluated {
                    level,
                    query,
                    outcome,
                });
            }
            DbRequest::Shutdown => break,
        }
    }
    tracing::debug!("Database worker stopped");
}
