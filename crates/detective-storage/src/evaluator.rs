use crate::guard::find_mutation_keyword;
use crate::{GraphDatabase, Params, QueryError};
use detective_core::{Level, PropertyValue, Record};
use detective_events::QueryOutcome;
use std::sync::Arc;

pub const MISMATCH_MESSAGE: &str =
    "Query executed successfully, but the results don't match the clue. Try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// Carries the player's records.
    Match { records: Vec<Record> },
    Mismatch { records: Vec<Record> },
    QueryError(QueryError),
}

impl Evaluation {
    pub fn is_match(&self) -> bool {
        matches!(self, Evaluation::Match { .. })
    }

    /// Text shown to the player for this outcome.
    pub fn message(&self, level: u32) -> String {
        match self {
            Evaluation::Match { .. } => format!("Level {level} completed."),
            Evaluation::Mismatch { .. } => MISMATCH_MESSAGE.to_string(),
            Evaluation::QueryError(QueryError::Empty) => QueryError::Empty.to_string(),
            Evaluation::QueryError(err) => format!("Query error: {err}"),
        }
    }
}

impl From<Evaluation> for QueryOutcome {
    fn from(evaluation: Evaluation) -> Self {
        match evaluation {
            Evaluation::Match { records } => QueryOutcome::Match { records },
            Evaluation::Mismatch { records } => QueryOutcome::Mismatch { records },
            Evaluation::QueryError(err @ (QueryError::Empty | QueryError::ReadOnlyViolation { .. })) => {
                QueryOutcome::Rejected {
                    message: Evaluation::QueryError(err).message(0),
                }
            }
            Evaluation::QueryError(err) => QueryOutcome::Failed {
                message: Evaluation::QueryError(err).message(0),
            },
        }
    }
}

/// Column-order and row-order independent form of a result set.
pub fn normalize_results(records: &[Record]) -> Vec<Vec<(String, PropertyValue)>> {
    let mut rows: Vec<_> = records.iter().map(Record::normalized).collect();
    rows.sort();
    rows
}

pub fn results_equivalent(left: &[Record], right: &[Record]) -> bool {
    left.len() == right.len() && normalize_results(left) == normalize_results(right)
}

/// Compares a player's query with a level's ground truth. Stateless; every call stands alone.
#[derive(Clone)]
pub struct QueryEvaluator {
    db: Arc<dyn GraphDatabase>,
}

impl QueryEvaluator {
    pub fn new(db: Arc<dyn GraphDatabase>) -> Self {
        Self { db }
    }

    pub fn evaluate(&self, user_query: &str, ground_truth_query: &str) -> Evaluation {
        let user_query = user_query.trim();
        if user_query.is_empty() {
            return Evaluation::QueryError(QueryError::Empty);
        }
        if let Some(keyword) = find_mutation_keyword(user_query) {
            tracing::info!(keyword, "Rejected query with mutation keyword");
            return Evaluation::QueryError(QueryError::ReadOnlyViolation { keyword });
        }

        let params = Params::new();
        let records = match self.db.execute(user_query, &params) {
            Ok(records) => records,
            Err(err) => {
                tracing::info!("Player query failed: {}", err);
                return Evaluation::QueryError(QueryError::Execution(err));
            }
        };
        let expected = match self.db.execute(ground_truth_query, &params) {
            Ok(expected) => expected,
            Err(err) => {
                tracing::error!("Ground truth query failed: {}", err);
                return Evaluation::QueryError(QueryError::GroundTruth(err));
            }
        };

        if results_equivalent(&records, &expected) {
            Evaluation::Match { records }
        } else {
            Evaluation::Mismatch { records }
        }
    }

    pub fn check_level(&self, level: &Level, user_query: &str) -> Evaluation {
        self.evaluate(user_query, &level.ground_truth_query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use crate::testing::FakeDatabase;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Record> {
        value
            .as_array()
            .map(|items| items.iter().cloned().map(Record::from_json).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_equivalence_ignores_row_and_column_order() {
        let a = rows(json!([{"a": 1, "b": 2}, {"a": 3, "b": 4}]));
        let b = rows(json!([{"b": 4, "a": 3}, {"b": 2, "a": 1}]));
        assert!(results_equivalent(&a, &b));
    }

    #[test]
    fn test_duplicates_matter() {
        let a = rows(json!([{"suspect": "Alice"}, {"suspect": "Alice"}]));
        let b = rows(json!([{"suspect": "Alice"}]));
        assert!(!results_equivalent(&a, &b));
    }

    #[test]
    fn test_column_names_matter() {
        let a = rows(json!([{"name": "Alice"}]));
        let b = rows(json!([{"suspect": "Alice"}]));
        assert!(!results_equivalent(&a, &b));
    }

    #[test]
    fn test_match_and_mismatch() {
        let db = FakeDatabase::new()
            .with_rows("MATCH alice", rows(json!([{"suspect": "Alice"}])))
            .with_rows("MATCH bob", rows(json!([{"suspect": "Bob"}])));
        let evaluator = QueryEvaluator::new(Arc::new(db));
        assert!(evaluator.evaluate("MATCH alice", "MATCH alice").is_match());
        assert_eq!(
            evaluator.evaluate("MATCH alice", "MATCH bob"),
            Evaluation::Mismatch {
                records: rows(json!([{"suspect": "Alice"}]))
            }
        );
    }

    #[test]
    fn test_empty_query_never_reaches_database() {
        let db = Arc::new(FakeDatabase::new());
        let evaluator = QueryEvaluator::new(db.clone());
        let result = evaluator.evaluate("   \n", "MATCH x");
        assert_eq!(result, Evaluation::QueryError(QueryError::Empty));
        assert_eq!(result.message(2), "Please enter a query.");
        assert_eq!(db.call_count(), 0);
    }

    #[test]
    fn test_execution_error_is_wrapped() {
        let db = FakeDatabase::new().with_error(
            "MATC (n)",
            StorageError::Query {
                code: "Neo.ClientError.Statement.SyntaxError".into(),
                message: "Invalid input".into(),
            },
        );
        let evaluator = QueryEvaluator::new(Arc::new(db));
        let result = evaluator.evaluate("MATC (n)", "MATCH (n)");
        assert!(matches!(
            result,
            Evaluation::QueryError(QueryError::Execution(StorageError::Query { .. }))
        ));
        assert_eq!(
            result.message(1),
            "Query error: Neo.ClientError.Statement.SyntaxError: Invalid input"
        );
    }

    #[test]
    fn test_outcome_conversion() {
        let rejected: QueryOutcome =
            Evaluation::QueryError(QueryError::ReadOnlyViolation { keyword: "DELETE" }).into();
        assert!(matches!(rejected, QueryOutcome::Rejected { .. }));
        let failed: QueryOutcome =
            Evaluation::QueryError(QueryError::Execution(StorageError::Connection("down".into())))
                .into();
        assert_eq!(
            failed,
            QueryOutcome::Failed {
                message: "Query error: Cannot reach the database: down".into()
            }
        );
    }
}
