//! JSON-RPC 2.0 envelopes.
//!
//! One request or notification per line in, one response per line out.
//! Notifications (no `id`) are never answered.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::advisor::AdvisorError;

pub const JSONRPC_VERSION: &str = "2.0";

// ============================================================================
// Error codes
// ============================================================================

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

// ============================================================================
// Envelopes
// ============================================================================

/// Incoming request or notification.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Absent for notifications.
    #[serde(default)]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl Request {
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Outgoing response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, error: &RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(ErrorObject {
                code: error.code(),
                message: error.to_string(),
            }),
        }
    }
}

/// Error member of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
}

/// Request-level failure, reported as a JSON-RPC error.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown method: {0}")]
    MethodNotFound(String),

    #[error("{0}")]
    InvalidParams(String),

    #[error("{0}")]
    Internal(String),
}

impl RpcError {
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Parse(_) => PARSE_ERROR,
            RpcError::InvalidRequest(_) => INVALID_REQUEST,
            RpcError::MethodNotFound(_) => METHOD_NOT_FOUND,
            RpcError::InvalidParams(_) => INVALID_PARAMS,
            RpcError::Internal(_) => INTERNAL_ERROR,
        }
    }
}

impl From<AdvisorError> for RpcError {
    fn from(err: AdvisorError) -> Self {
        match err {
            AdvisorError::MissingInput => RpcError::InvalidParams(err.to_string()),
            AdvisorError::Upstream(_) => RpcError::Internal(err.to_string()),
        }
    }
}

// ============================================================================
// Tool payloads
// ============================================================================

/// `params` of `tools/call`.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: ToolArguments,
}

/// Arguments shared by both tools.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolArguments {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
}

/// `result` of `tools/call`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    pub content: Vec<TextContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![TextContent {
                kind: "text",
                text: text.into(),
            }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::text(text)
        }
    }
}
