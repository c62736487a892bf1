//! Wire types for the Neo4j HTTP transactional API.
//!
//! Only the subset used to collect plans is modelled:
//! `POST /db/{database}/tx/commit` with one statement, answered by a single
//! result whose `plan` (EXPLAIN) or `profile` (PROFILE) member holds the plan
//! tree wrapped in `{"root": ...}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Request
// ============================================================================

/// Body of a transactional commit request.
#[derive(Debug, Clone, Serialize)]
pub struct CommitRequest {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub statement: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parameters: Map<String, Value>,
    #[serde(rename = "resultDataContents")]
    pub result_data_contents: Vec<&'static str>,
}

impl CommitRequest {
    /// A request with a single parameterless statement.
    pub fn single(statement: impl Into<String>) -> Self {
        Self {
            statements: vec![Statement {
                statement: statement.into(),
                parameters: Map::new(),
                result_data_contents: vec!["row"],
            }],
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// Body of a transactional commit response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitResponse {
    #[serde(default)]
    pub results: Vec<StatementResult>,
    #[serde(default)]
    pub errors: Vec<ErrorInfo>,
}

/// Result of one statement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatementResult {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub data: Vec<Value>,
    /// Present for EXPLAIN.
    #[serde(default)]
    pub plan: Option<Value>,
    /// Present for PROFILE.
    #[serde(default)]
    pub profile: Option<Value>,
}

/// Error entry in a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}
