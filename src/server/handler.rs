//! Method dispatch for the JSON-RPC server.

use serde_json::{json, Value};

use super::protocol::{Request, Response, RpcError, ToolArguments, ToolCall, ToolResult};
use crate::advisor::{Advisor, AdvisorError};
use crate::report;

/// Protocol revision announced by `initialize`.
pub const PROTOCOL_VERSION: &str = "2025-06-18";

/// Name announced by `initialize`.
pub const SERVER_NAME: &str = "neo4j-optimizer-agent";

pub const OPTIMIZE_TOOL: &str = "optimize-neo4j-query";
pub const ANALYZE_TOOL: &str = "analyze-query-plan";

/// Stateless request handler. Each request is answered independently.
#[derive(Clone)]
pub struct Handler {
    advisor: Advisor,
}

impl Handler {
    pub fn new(advisor: Advisor) -> Self {
        Self { advisor }
    }

    /// Handle one raw input line. `None` when nothing should be written back.
    pub async fn handle_line(&self, line: &str) -> Option<Response> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(error = %err, "unparseable request line");
                return Some(Response::failure(Value::Null, &RpcError::Parse(err.to_string())));
            }
        };

        match serde_json::from_value::<Request>(value.clone()) {
            Ok(request) => self.handle(request).await,
            Err(err) => {
                let id = value.get("id").cloned().unwrap_or(Value::Null);
                Some(Response::failure(id, &RpcError::InvalidRequest(err.to_string())))
            }
        }
    }

    /// Handle a decoded request.
    pub async fn handle(&self, request: Request) -> Option<Response> {
        tracing::debug!(method = %request.method, "request");

        let outcome = self.dispatch(&request).await;

        let id = request.id?;
        Some(match outcome {
            Ok(result) => Response::success(id, result),
            Err(err) => {
                tracing::warn!(method = %request.method, error = %err, "request failed");
                Response::failure(id, &err)
            }
        })
    }

    async fn dispatch(&self, request: &Request) -> Result<Value, RpcError> {
        match request.method.as_str() {
            "initialize" => Ok(initialize_result()),
            "tools/list" => Ok(tools_list_result()),
            "tools/call" => self.call_tool(&request.params).await,
            "ping" => Ok(json!({})),
            method if method.starts_with("notifications/") => Ok(Value::Null),
            method => Err(RpcError::MethodNotFound(method.to_string())),
        }
    }

    async fn call_tool(&self, params: &Value) -> Result<Value, RpcError> {
        let call: ToolCall = serde_json::from_value(params.clone())
            .map_err(|err| RpcError::InvalidParams(format!("invalid tools/call params: {err}")))?;

        let ToolArguments { query, database } = call.arguments;
        let query = query.ok_or(AdvisorError::MissingInput)?;
        let database = database.as_deref().filter(|db| !db.is_empty());

        let result = match call.name.as_str() {
            OPTIMIZE_TOOL => self
                .advisor
                .optimize(&query, database)
                .await
                .map(|report| report::render_optimization(&report)),
            ANALYZE_TOOL => self
                .advisor
                .analyze(&query, database)
                .await
                .map(|result| report::render_plan_report(&result.plan, &result.analysis)),
            other => return Err(RpcError::InvalidParams(format!("Unknown tool: {other}"))),
        };

        let tool_result = match result {
            Ok(text) => ToolResult::text(text),
            Err(err @ AdvisorError::Upstream(_)) => {
                tracing::warn!(tool = %call.name, error = %err, "tool failed");
                ToolResult::error(format!("Error running {}: {}", call.name, err))
            }
            Err(err) => return Err(err.into()),
        };

        serde_json::to_value(tool_result).map_err(|err| RpcError::Internal(err.to_string()))
    }
}

pub fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {"tools": {}},
        "serverInfo": {
            "name": SERVER_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        }
    })
}

pub fn tools_list_result() -> Value {
    json!({
        "tools": [
            {
                "name": OPTIMIZE_TOOL,
                "description": "Analyze a Neo4j query, optimize it, and compare the before/after query plans to show improvements",
                "inputSchema": tool_schema("The Cypher query to analyze and optimize"),
            },
            {
                "name": ANALYZE_TOOL,
                "description": "Get detailed query plan analysis for a Cypher query without optimization",
                "inputSchema": tool_schema("The Cypher query to analyze"),
            },
        ]
    })
}

fn tool_schema(query_description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {"type": "string", "description": query_description},
            "database": {
                "type": "string",
                "description": "Optional database name (defaults to the configured database)",
            },
        },
        "required": ["query"],
    })
}
