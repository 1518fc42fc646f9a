//! In-memory [`GraphDatabase`] with scripted answers, for tests and offline demos.

use crate::loader::{EDGE_QUERY, NODE_QUERY};
use crate::{GraphDatabase, Params, StorageError};
use detective_core::Record;
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
pub struct FakeDatabase {
    responses: Mutex<HashMap<String, Result<Vec<Record>, StorageError>>>,
    executed: Mutex<Vec<String>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, query: &str, rows: Vec<Record>) -> Self {
        self.set_rows(query, rows);
        self
    }

    pub fn with_error(self, query: &str, error: StorageError) -> Self {
        self.responses.lock().insert(query.trim().to_string(), Err(error));
        self
    }

    /// Script the two loader queries at once.
    pub fn with_graph(self, node_rows: Vec<Record>, edge_rows: Vec<Record>) -> Self {
        self.with_rows(NODE_QUERY, node_rows)
            .with_rows(EDGE_QUERY, edge_rows)
    }

    pub fn set_rows(&self, query: &str, rows: Vec<Record>) {
        self.responses
            .lock()
            .insert(query.trim().to_string(), Ok(rows));
    }

    /// Number of queries that reached the database.
    pub fn call_count(&self) -> usize {
        self.executed.lock().len()
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().clone()
    }
}

impl GraphDatabase for FakeDatabase {
    fn execute(&self, query: &str, _params: &Params) -> Result<Vec<Record>, StorageError> {
        let query = query.trim();
        self.executed.lock().push(query.to_string());
        self.responses
            .lock()
            .get(query)
            .cloned()
            .unwrap_or_else(|| {
                Err(StorageError::Query {
                    code: "Fake.NoScriptedResponse".to_string(),
                    message: format!("no response scripted for `{query}`"),
                })
            })
    }
}
