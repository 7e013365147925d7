//! HTTP, SSE and WebSocket transport tests.

#![cfg(feature = "http")]

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use futures::{SinkExt, StreamExt};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tower::ServiceExt;

use citation_verifier_mcp::transport::HttpTransport;

use common::*;

// ─────────────────────── helpers ───────────────────────

fn transport() -> HttpTransport {
    transport_with_stub().0
}

/// Transport plus the stub behind it, for counting verifier calls.
fn transport_with_stub() -> (HttpTransport, Arc<StubVerifier>) {
    let (handler, stub) = stub_handler();
    (HttpTransport::new(handler, Duration::from_secs(1)), stub)
}

async fn get(path: &str) -> (StatusCode, Value) {
    let resp = transport()
        .router()
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post(path: &str, body: impl Into<String>) -> (StatusCode, Value) {
    post_to(&transport(), path, body).await
}

async fn post_to(
    transport: &HttpTransport,
    path: &str,
    body: impl Into<String>,
) -> (StatusCode, Value) {
    let resp = transport
        .router()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(path)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.into()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// Start a real server on an ephemeral port and return its WebSocket URL.
async fn spawn_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let transport = transport();
    tokio::spawn(async move {
        let _ = transport.serve(listener).await;
    });
    format!("ws://{addr}/mcp")
}

async fn next_text<S>(socket: &mut S) -> Value
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        match tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .expect("timed out waiting for a frame")
        {
            Some(Ok(Message::Text(text))) => return serde_json::from_str(&text).unwrap(),
            Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
            other => panic!("expected a text frame, got {other:?}"),
        }
    }
}

// ═══════════════════════════════════════════════════════
// SERVICE ROUTES
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_health() {
    let (status, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "healthy", "service": "citation-verifier-mcp" }));
}

#[tokio::test]
async fn test_root_descriptor() {
    let (status, body) = get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Citation Verifier MCP Server");
    assert_eq!(body["endpoints"]["websocket"], "/mcp");
    assert_eq!(body["endpoints"]["sse"], "/sse");
    assert_eq!(body["endpoints"]["health"], "/health");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let resp = transport()
        .router()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "https://example.org")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        resp.headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

// ═══════════════════════════════════════════════════════
// POST
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_post_on_both_paths() {
    for path in ["/", "/messages"] {
        let (status, body) = post(path, mcp_request(1, "tools/list", json!({})).to_string()).await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body["id"], 1);
        assert_eq!(body["result"]["tools"][0]["name"], "verify_citation");
    }
}

#[tokio::test]
async fn test_post_tool_call() {
    let (transport, stub) = transport_with_stub();
    let (status, body) =
        post_to(&transport, "/messages", verify_request(9, KNOWN_DOI).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 9);
    let text = body["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("# ✅ Citation Verified"), "{text}");
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_post_protocol_errors_are_200() {
    let (status, body) = post("/", mcp_request(2, "unknown/method", json!({})).to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32601);
}

#[tokio::test]
async fn test_post_rejects_non_json() {
    let (transport, stub) = transport_with_stub();
    // A verify call cut off mid-object.
    let truncated = verify_request(1, KNOWN_DOI).to_string();
    let truncated = &truncated[..truncated.len() - 2];

    let (status, body) = post_to(&transport, "/messages", truncated).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);

    let (status, _) = post_to(&transport, "/", "not json at all").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_post_rejects_wrong_shape() {
    let (transport, stub) = transport_with_stub();
    let wrong_shape = json!({
        "jsonrpc": "1.0",
        "id": 1,
        "method": "tools/call",
        "params": { "name": "verify_citation", "arguments": { "doi": KNOWN_DOI } }
    });

    let (status, body) = post_to(&transport, "/messages", wrong_shape.to_string()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], -32600);

    let (status, _) = post_to(&transport, "/messages", r#"{"id":1,"params":{}}"#).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

// ═══════════════════════════════════════════════════════
// SSE
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_sse_connect_then_keepalive() {
    let resp = transport()
        .router()
        .oneshot(Request::builder().uri("/sse").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));

    let mut body = resp.into_body();
    let mut received = String::new();
    while !received.contains("event: keepalive") {
        let frame = tokio::time::timeout(Duration::from_secs(5), body.frame())
            .await
            .expect("timed out waiting for an SSE event")
            .expect("stream ended")
            .unwrap();
        if let Ok(data) = frame.into_data() {
            received.push_str(std::str::from_utf8(&data).unwrap());
        }
    }

    let connect = received.find("event: connect").unwrap();
    let keepalive = received.find("event: keepalive").unwrap();
    assert!(connect < keepalive, "{received}");
    assert!(received.contains(r#"data: {"status":"ready","type":"connection"}"#)
        || received.contains(r#"data: {"type":"connection","status":"ready"}"#));
}

// ═══════════════════════════════════════════════════════
// WEBSOCKET
// ═══════════════════════════════════════════════════════

#[tokio::test]
async fn test_ws_request_response_in_order() {
    let url = spawn_server().await;
    let (mut socket, _) = connect_async(url.as_str()).await.unwrap();

    socket
        .send(Message::Text(mcp_request(1, "initialize", json!({})).to_string()))
        .await
        .unwrap();
    let init = next_text(&mut socket).await;
    assert_eq!(init["id"], 1);
    assert_eq!(init["result"]["serverInfo"]["name"], "citation-verifier");

    socket
        .send(Message::Text(verify_request(2, "10.9999/fake").to_string()))
        .await
        .unwrap();
    let verify = next_text(&mut socket).await;
    assert_eq!(verify["id"], 2);
    let text = verify["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text.starts_with("# ❌ Citation Not Verified"), "{text}");

    socket
        .send(Message::Text(json!({ "jsonrpc": "2.0", "method": "tools/list" }).to_string()))
        .await
        .unwrap();
    let no_id = next_text(&mut socket).await;
    assert!(!no_id.as_object().unwrap().contains_key("id"));
    assert!(no_id["result"]["tools"].is_array());

    socket
        .send(Message::Text(
            mcp_request(3, "tools/call", json!({ "name": "nonexistent_tool" })).to_string(),
        ))
        .await
        .unwrap();
    let unknown = next_text(&mut socket).await;
    assert_eq!(unknown["id"], 3);
    assert_eq!(unknown["error"]["code"], -32601);
}

#[tokio::test]
async fn test_ws_malformed_frame_closes_only_that_connection() {
    let url = spawn_server().await;
    let (mut bad, _) = connect_async(url.as_str()).await.unwrap();
    let (mut good, _) = connect_async(url.as_str()).await.unwrap();

    bad.send(Message::Text("invalid json".to_string())).await.unwrap();
    let ended = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match bad.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "malformed frame should end the connection");

    good.send(Message::Text(mcp_request(1, "tools/list", json!({})).to_string()))
        .await
        .unwrap();
    let resp = next_text(&mut good).await;
    assert_eq!(resp["id"], 1);
}

#[tokio::test]
async fn test_ws_parallel_connections() {
    let url = spawn_server().await;

    let mut tasks = Vec::new();
    for i in 0..8i64 {
        let url = url.clone();
        tasks.push(tokio::spawn(async move {
            let (mut socket, _) = connect_async(url.as_str()).await.unwrap();
            socket
                .send(Message::Text(verify_request(i, KNOWN_DOI).to_string()))
                .await
                .unwrap();
            let resp = next_text(&mut socket).await;
            (i, resp)
        }));
    }

    for task in tasks {
        let (i, resp) = task.await.unwrap();
        assert_eq!(resp["id"], i);
        assert!(resp["result"]["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("Citation Verified"));
    }
}
