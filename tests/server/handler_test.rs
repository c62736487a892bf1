//! JSON-RPC handler tests over an in-memory transport.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cypher_advisor::advisor::Advisor;
use cypher_advisor::config::AnalysisSettings;
use cypher_advisor::neo4j::{ClientError, ClientResult, PlanProvider, Unconfigured};
use cypher_advisor::plan::PlanNode;
use cypher_advisor::server::{serve, Handler, Response, ANALYZE_TOOL, OPTIMIZE_TOOL, PROTOCOL_VERSION};
use serde_json::{json, Value};

/// Returns the same plan for every query; PROFILE is unsupported.
struct FixedPlan(PlanNode);

#[async_trait]
impl PlanProvider for FixedPlan {
    async fn explain(&self, _query: &str, _database: Option<&str>) -> ClientResult<PlanNode> {
        Ok(self.0.clone())
    }

    async fn profile(
        &self,
        _query: &str,
        _database: Option<&str>,
    ) -> ClientResult<(PlanNode, Duration)> {
        Err(ClientError::MissingPlan("profile"))
    }

    async fn verify(&self) -> ClientResult<()> {
        Ok(())
    }
}

fn handler_with(provider: Arc<dyn PlanProvider>) -> Handler {
    Handler::new(Advisor::new(provider, AnalysisSettings::default()))
}

fn scan_handler() -> Handler {
    let plan = PlanNode::new("ProduceResults@neo4j")
        .with_estimated_rows(100)
        .with_child(PlanNode::new("AllNodesScan@neo4j").with_estimated_rows(100));
    handler_with(Arc::new(FixedPlan(plan)))
}

async fn call(handler: &Handler, request: Value) -> Response {
    handler
        .handle_line(&request.to_string())
        .await
        .expect("request should be answered")
}

fn tool_call(id: u64, name: &str, arguments: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {"name": name, "arguments": arguments},
    })
}

#[tokio::test]
async fn test_initialize() {
    let response = call(
        &scan_handler(),
        json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}),
    )
    .await;

    let result = response.result.unwrap();
    assert_eq!(response.id, json!(1));
    assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
    assert_eq!(result["serverInfo"]["name"], "neo4j-optimizer-agent");
    assert_eq!(result["capabilities"], json!({"tools": {}}));
}

#[tokio::test]
async fn test_tools_list() {
    let response = call(
        &scan_handler(),
        json!({"jsonrpc": "2.0", "id": "list", "method": "tools/list"}),
    )
    .await;

    let tools = response.result.unwrap()["tools"].clone();
    let names: Vec<&str> = tools
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec![OPTIMIZE_TOOL, ANALYZE_TOOL]);
    assert_eq!(tools[0]["inputSchema"]["required"], json!(["query"]));
}

#[tokio::test]
async fn test_ping_and_notifications() {
    let handler = scan_handler();

    let pong = call(&handler, json!({"jsonrpc": "2.0", "id": 3, "method": "ping"})).await;
    assert_eq!(pong.result, Some(json!({})));

    let notification = json!({"jsonrpc": "2.0", "method": "notifications/initialized"});
    assert!(handler.handle_line(&notification.to_string()).await.is_none());
    assert!(handler.handle_line("   ").await.is_none());
}

#[tokio::test]
async fn test_protocol_errors() {
    let handler = scan_handler();

    let parse = handler.handle_line("{not json").await.unwrap();
    assert_eq!(parse.id, Value::Null);
    assert_eq!(parse.error.unwrap().code, -32700);

    let invalid = call(&handler, json!({"jsonrpc": "2.0", "id": 4, "params": {}})).await;
    assert_eq!(invalid.id, json!(4));
    assert_eq!(invalid.error.unwrap().code, -32600);

    let unknown = call(&handler, json!({"jsonrpc": "2.0", "id": 5, "method": "resources/list"})).await;
    let error = unknown.error.unwrap();
    assert_eq!(error.code, -32601);
    assert_eq!(error.message, "Unknown method: resources/list");
}

#[tokio::test]
async fn test_missing_query_is_invalid_params() {
    let response = call(&scan_handler(), tool_call(6, ANALYZE_TOOL, json!({}))).await;
    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert_eq!(error.message, "Query is required");

    let blank = call(&scan_handler(), tool_call(7, OPTIMIZE_TOOL, json!({"query": "  "}))).await;
    assert_eq!(blank.error.unwrap().code, -32602);
}

#[tokio::test]
async fn test_unknown_tool() {
    let response = call(&scan_handler(), tool_call(8, "drop-database", json!({"query": "x"}))).await;
    let error = response.error.unwrap();
    assert_eq!(error.code, -32602);
    assert_eq!(error.message, "Unknown tool: drop-database");
}

#[tokio::test]
async fn test_analyze_tool_returns_report() {
    let response = call(
        &scan_handler(),
        tool_call(9, ANALYZE_TOOL, json!({"query": "MATCH (n) RETURN n"})),
    )
    .await;

    let result = response.result.unwrap();
    assert!(result.get("isError").is_none());
    assert_eq!(result["content"][0]["type"], "text");
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("# Query Plan Analysis"));
    assert!(text.contains("**[Critical] AllNodesScan**"));
}

#[tokio::test]
async fn test_optimize_tool_returns_report() {
    let response = call(
        &scan_handler(),
        tool_call(10, OPTIMIZE_TOOL, json!({"query": "MATCH (n) RETURN n", "database": ""})),
    )
    .await;

    let text = response.result.unwrap()["content"][0]["text"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(text.starts_with("# Neo4j Query Optimization Analysis"));
    assert!(text.contains("MATCH (n:Node) RETURN n LIMIT 1000"));
}

#[tokio::test]
async fn test_upstream_failure_is_tool_error() {
    let handler = handler_with(Arc::new(Unconfigured::new("NEO4J_URI is not set")));
    let response = call(
        &handler,
        tool_call(11, ANALYZE_TOOL, json!({"query": "MATCH (n) RETURN n"})),
    )
    .await;

    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("Error running analyze-query-plan: Failed to get query plan"));
}

#[tokio::test]
async fn test_serve_answers_each_line() {
    let input = [
        json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}).to_string(),
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
        String::new(),
        "garbage".to_string(),
        json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}).to_string(),
    ]
    .join("\n");

    let mut output = Vec::new();
    serve(scan_handler(), input.as_bytes(), &mut output).await.unwrap();

    let responses: Vec<Response> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0].id, json!(1));
    assert_eq!(responses[1].error.as_ref().unwrap().code, -32700);
    assert_eq!(responses[2].id, json!(2));
}

#[tokio::test]
async fn test_serve_survives_invalid_utf8() {
    let input: &[u8] = b"\xff\xfe garbage\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n";

    let mut output = Vec::new();
    serve(scan_handler(), input, &mut output).await.unwrap();

    let responses: Vec<Response> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0].id, Value::Null);
    assert_eq!(responses[0].error.as_ref().unwrap().code, -32700);
    assert_eq!(responses[1].id, json!(1));
    assert_eq!(responses[1].result, Some(json!({})));
}
