//! HTTP client tests against a canned local server.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cypher_advisor::config::ConnectionConfig;
use cypher_advisor::neo4j::{ClientError, Neo4jHttpClient, PlanProvider};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A captured request: request line and JSON body.
type Captured = Arc<Mutex<Vec<(String, Value)>>>;

/// Answer every connection with the same status and body.
async fn canned_server(status: u16, body: Value) -> (String, Captured) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured: Captured = Arc::default();
    let sink = captured.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let (request_line, request_body) = read_request(&mut socket).await;
            sink.lock().unwrap().push((request_line, request_body));

            let payload = body.to_string();
            let response = format!(
                "HTTP/1.1 {status} Canned\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{payload}",
                payload.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });

    (format!("http://{addr}"), captured)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> (String, Value) {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break buffer.len();
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buffer.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
    let content_length = content_length.min(buffer.len() - header_end);

    let request_line = head.lines().next().unwrap_or_default().to_string();
    let body = serde_json::from_slice(&buffer[header_end..header_end + content_length])
        .unwrap_or(Value::Null);
    (request_line, body)
}

fn client_for(base_url: String) -> Neo4jHttpClient {
    Neo4jHttpClient::new(ConnectionConfig {
        base_url,
        user: "neo4j".to_string(),
        password: "secret".to_string(),
        database: "neo4j".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_explain_reads_plan() {
    let (url, captured) = canned_server(
        200,
        json!({
            "results": [{
                "columns": ["n"],
                "data": [],
                "plan": {"root": {
                    "operatorType": "ProduceResults@neo4j",
                    "EstimatedRows": 10.0,
                    "identifiers": ["n"],
                    "children": [{
                        "operatorType": "NodeByLabelScan@neo4j",
                        "EstimatedRows": 10.0,
                        "identifiers": ["n"],
                        "children": []
                    }]
                }}
            }],
            "errors": []
        }),
    )
    .await;

    let plan = client_for(url)
        .explain("MATCH (n:Person) RETURN n", Some("movies"))
        .await
        .unwrap();

    assert_eq!(plan.operator, "ProduceResults@neo4j");
    assert_eq!(plan.children.len(), 1);
    assert_eq!(plan.children[0].operator, "NodeByLabelScan@neo4j");
    assert_eq!(plan.children[0].estimated_rows, 10);

    let requests = captured.lock().unwrap();
    let (request_line, body) = &requests[0];
    assert_eq!(request_line, "POST /db/movies/tx/commit HTTP/1.1");
    assert_eq!(body["statements"][0]["statement"], "EXPLAIN MATCH (n:Person) RETURN n");
}

#[tokio::test]
async fn test_remote_error() {
    let (url, _) = canned_server(
        200,
        json!({
            "results": [],
            "errors": [{"code": "Neo.ClientError.Statement.SyntaxError", "message": "Invalid input 'RETRN'"}]
        }),
    )
    .await;

    let err = client_for(url).explain("MATCH (n) RETRN n", None).await.unwrap_err();

    assert!(err.is_statement_error());
    assert!(err.to_string().contains("Invalid input 'RETRN'"));
}

#[tokio::test]
async fn test_http_status_error() {
    let (url, _) = canned_server(401, json!({"errors": [{"code": "Unauthorized", "message": "no"}]})).await;

    let err = client_for(url).verify().await.unwrap_err();

    assert!(matches!(err, ClientError::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_missing_profile_plan() {
    let (url, _) = canned_server(200, json!({"results": [{"columns": [], "data": []}], "errors": []})).await;

    let err = client_for(url).profile("MATCH (n) RETURN n", None).await.unwrap_err();

    assert!(matches!(err, ClientError::MissingPlan("PROFILE")));
}
