//! Errors raised while talking to Neo4j.

use thiserror::Error;

use crate::config::ConnectionError;

/// Result type for Neo4j operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors that can occur while obtaining a plan.
#[derive(Error, Debug)]
pub enum ClientError {
    /// No usable connection configuration.
    #[error("Neo4j connection not configured: {0}")]
    NotConfigured(String),

    #[error(transparent)]
    Config(#[from] ConnectionError),

    /// Transport-level failure (DNS, TLS, connection refused).
    #[error("request to Neo4j failed: {0}")]
    Http(#[source] reqwest::Error),

    /// Request timed out waiting for response.
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Non-success HTTP status.
    #[error("Neo4j returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Failed to deserialize response from JSON.
    #[error("failed to deserialize response: {0}")]
    DeserializeFailed(#[source] serde_json::Error),

    /// Neo4j reported an error for the statement.
    #[error("{message} (code: {code})")]
    Remote { code: String, message: String },

    /// The response carried no plan for an EXPLAIN/PROFILE statement.
    #[error("Neo4j response contained no {0} plan")]
    MissingPlan(&'static str),
}

impl ClientError {
    /// Create a remote error from an error entry in the response.
    pub fn remote(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            code: code.into(),
            message: message.into(),
        }
    }

    /// True for Cypher syntax and semantic errors reported by the server.
    pub fn is_statement_error(&self) -> bool {
        matches!(self, Self::Remote { code, .. } if code.starts_with("Neo.ClientError.Statement"))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::DeserializeFailed(err)
    }
}
