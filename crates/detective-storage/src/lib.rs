use detective_core::{Record, RecordError};
use thiserror::Error;

mod evaluator;
mod guard;
mod loader;
mod neo4j;
mod row_mapping;
pub mod testing;
mod worker;

pub use evaluator::{
    Evaluation, MISMATCH_MESSAGE, QueryEvaluator, normalize_results, results_equivalent,
};
pub use guard::{MUTATION_KEYWORDS, find_mutation_keyword, validate_read_only};
pub use loader::{
    EDGE_QUERY, GraphLoader, LoadOutcome, LoadedGraph, NODE_QUERY, RESTRICTED_LABELS,
    VisibilityRule, build_graph,
};
pub use neo4j::{DatabaseConfig, Neo4jClient};
pub use worker::{DatabaseWorker, DbRequest, WorkerError};

/// Query parameters, sent to the database as a JSON object.
pub type Params = serde_json::Map<String, serde_json::Value>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    #[error("Cannot reach the database: {0}")]
    Connection(String),
    #[error("{code}: {message}")]
    Query { code: String, message: String },
    #[error("Malformed database response: {0}")]
    MalformedResponse(String),
    #[error("HTTP error: {0}")]
    Http(String),
}

/// Reasons a submitted query never produced a comparable result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Please enter a query.")]
    Empty,
    #[error("Only read queries are allowed ({keyword} is not permitted)")]
    ReadOnlyViolation { keyword: &'static str },
    #[error("{0}")]
    Execution(StorageError),
    #[error("ground truth query failed: {0}")]
    GroundTruth(StorageError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    #[error("Database error: {0}")]
    Database(#[from] StorageError),
    #[error("Malformed row from `{query}`: {reason}")]
    MalformedRow { query: &'static str, reason: String },
}

impl LoadError {
    fn row(query: &'static str, err: RecordError) -> Self {
        LoadError::MalformedRow {
            query,
            reason: err.to_string(),
        }
    }
}

/// Cheapest query that proves the server is up and the credentials work.
pub const PING_QUERY: &str = "RETURN 1 AS ok";

/// The single read-only connection every component shares.
pub trait GraphDatabase: Send + Sync {
    fn execute(&self, query: &str, params: &Params) -> Result<Vec<Record>, StorageError>;

    fn verify_connectivity(&self) -> Result<(), StorageError> {
        self.execute(PING_QUERY, &Params::new()).map(|_| ())
    }
}
