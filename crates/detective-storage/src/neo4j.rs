//! Client for the Neo4j HTTP transactional endpoint (`/db/{name}/tx/commit`).

use crate::{GraphDatabase, Params, StorageError};
use detective_core::Record;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "http://localhost:7474".to_string(),
            user: "neo4j".to_string(),
            password: "password".to_string(),
            database: "neo4j".to_string(),
        }
    }
}

impl DatabaseConfig {
    pub const ENV_URI: &'static str = "CYPHER_DETECTIVE_DB_URI";
    pub const ENV_USER: &'static str = "CYPHER_DETECTIVE_DB_USER";
    pub const ENV_PASSWORD: &'static str = "CYPHER_DETECTIVE_DB_PASSWORD";

    /// Apply `CYPHER_DETECTIVE_DB_*` variables on top of the stored values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(uri) = std::env::var(Self::ENV_URI) {
            self.uri = uri;
        }
        if let Ok(user) = std::env::var(Self::ENV_USER) {
            self.user = user;
        }
        if let Ok(password) = std::env::var(Self::ENV_PASSWORD) {
            self.password = password;
        }
        self
    }

    pub fn commit_endpoint(&self) -> String {
        format!(
            "{}/db/{}/tx/commit",
            self.uri.trim_end_matches('/'),
            self.database
        )
    }
}

#[derive(Serialize)]
struct TxRequest<'a> {
    statements: [TxStatement<'a>; 1],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TxStatement<'a> {
    statement: &'a str,
    parameters: &'a Params,
    result_data_contents: [&'static str; 1],
}

#[derive(Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Deserialize)]
struct TxResult {
    columns: Vec<String>,
    #[serde(default)]
    data: Vec<TxRow>,
}

#[derive(Deserialize)]
struct TxRow {
    row: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
struct TxError {
    code: String,
    message: String,
}

/// Blocking HTTP connection to a Neo4j server, opened once and shared.
pub struct Neo4jClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    config: DatabaseConfig,
}

impl Neo4jClient {
    const TIMEOUT: Duration = Duration::from_secs(30);
    /// Asks the server to run every transaction in a read-only session.
    pub const ACCESS_MODE_HEADER: &'static str = "access-mode";
    pub const READ_ACCESS: &'static str = "READ";

    pub fn connect(config: DatabaseConfig) -> Result<Self, StorageError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Self::TIMEOUT)
            .build()
            .map_err(|e| StorageError::Http(e.to_string()))?;
        let endpoint = config.commit_endpoint();
        tracing::info!("Using graph database at {}", endpoint);
        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    fn request(&self, body: &TxRequest<'_>) -> reqwest::blocking::RequestBuilder {
        self.http
            .post(&self.endpoint)
            .basic_auth(&self.config.user, Some(&self.config.password))
            .header(Self::ACCESS_MODE_HEADER, Self::READ_ACCESS)
            .json(body)
    }
}

fn map_http_error(err: reqwest::Error) -> StorageError {
    if err.is_connect() || err.is_timeout() {
        StorageError::Connection(err.to_string())
    } else {
        StorageError::Http(err.to_string())
    }
}

/// Turn a transactional-endpoint body into records of the first statement.
fn parse_response(body: &str) -> Result<Vec<Record>, StorageError> {
    let response: TxResponse = serde_json::from_str(body)
        .map_err(|e| StorageError::MalformedResponse(e.to_string()))?;
    if let Some(error) = response.errors.into_iter().next() {
        return Err(StorageError::Query {
            code: error.code,
            message: error.message,
        });
    }
    let Some(result) = response.results.into_iter().next() else {
        return Err(StorageError::MalformedResponse(
            "response has no results".to_string(),
        ));
    };
    result
        .data
        .into_iter()
        .map(|data| {
            if data.row.len() != result.columns.len() {
                return Err(StorageError::MalformedResponse(format!(
                    "row has {} values for {} columns",
                    data.row.len(),
                    result.columns.len()
                )));
            }
            Ok(Record::from_pairs(
                result.columns.iter().cloned().zip(data.row),
            ))
        })
        .collect()
}

impl GraphDatabase for Neo4jClient {
    fn execute(&self, query: &str, params: &Params) -> Result<Vec<Record>, StorageError> {
        let request = TxRequest {
            statements: [TxStatement {
                statement: query,
                parameters: params,
                result_data_contents: ["row"],
            }],
        };
        tracing::debug!(query, "Executing query");
        let response = self.request(&request).send().map_err(map_http_error)?;

        let status = response.status();
        let body = response.text().map_err(map_http_error)?;
        match parse_response(&body) {
            Err(StorageError::MalformedResponse(_)) if !status.is_success() => {
                Err(StorageError::Http(format!("{status}")))
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use detective_core::PropertyValue;

    #[test]
    fn test_parse_rows_keep_column_order() {
        let body = r#"{
            "results": [{"columns": ["suspect", "total"], "data": [
                {"row": ["Alice", 475500], "meta": [null, null]},
                {"row": ["Bob", 12.5], "meta": [null, null]}
            ]}],
            "errors": []
        }"#;
        let records = parse_response(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("suspect"), Some(&PropertyValue::from("Alice")));
        assert_eq!(records[0].get("total"), Some(&PropertyValue::Int(475500)));
        assert_eq!(records[1].get("total"), Some(&PropertyValue::Float(12.5)));
        let columns: Vec<&str> = records[0].columns().map(|(k, _)| k.as_str()).collect();
        assert_eq!(columns, vec!["suspect", "total"]);
    }

    #[test]
    fn test_parse_error_response() {
        let body = r#"{"results": [], "errors": [
            {"code": "Neo.ClientError.Statement.SyntaxError", "message": "Invalid input 'MATC'"}
        ]}"#;
        assert_eq!(
            parse_response(body),
            Err(StorageError::Query {
                code: "Neo.ClientError.Statement.SyntaxError".into(),
                message: "Invalid input 'MATC'".into(),
            })
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_response("<html>"),
            Err(StorageError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        let config = DatabaseConfig {
            uri: "http://db.local:7474/".into(),
            database: "cases".into(),
            ..DatabaseConfig::default()
        };
        assert_eq!(config.commit_endpoint(), "http://db.local:7474/db/cases/tx/commit");
    }

    #[test]
    fn test_request_shape() {
        let params = Params::new();
        let request = TxRequest {
            statements: [TxStatement {
                statement: "RETURN 1",
                parameters: &params,
                result_data_contents: ["row"],
            }],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"statements": [{
                "statement": "RETURN 1",
                "parameters": {},
                "resultDataContents": ["row"]
            }]})
        );
    }

    #[test]
    fn test_requests_are_read_only() {
        let client = Neo4jClient::connect(DatabaseConfig::default()).unwrap();
        let params = Params::new();
        let body = TxRequest {
            statements: [TxStatement {
                statement: "MATCH (n) RETURN n",
                parameters: &params,
                result_data_contents: ["row"],
            }],
        };
        let request = client.request(&body).build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:7474/db/neo4j/tx/commit");
        assert_eq!(
            request
                .headers()
                .get(Neo4jClient::ACCESS_MODE_HEADER)
                .and_then(|v| v.to_str().ok()),
            Some("READ")
        );
        assert!(request.headers().contains_key(reqwest::header::AUTHORIZATION));
    }
}
