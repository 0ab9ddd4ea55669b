// JSON-RPC transport tests - A2A message/send and message/stream handled
// directly through the axum handler.

#[path = "../common/mod.rs"]
mod common;

use axum::body::{Bytes, to_bytes};
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use common::{TestAgent, gatherer_script};
use serde_json::{Value, json};
use skycast_core::constants::{A2UI_EXTENSION_URI, A2UI_MIME_TYPE, EMPTY_TURN_TEXT};
use skycast_core::rpc::{extension_requested, handle_rpc};
use skycast_core::server::{AgentCard, ServerState};
use std::sync::Arc;

fn state(agent: &TestAgent, force_ui: bool) -> Arc<ServerState> {
    Arc::new(ServerState::new(
        agent.router.clone(),
        AgentCard::weather("http://localhost:10002/"),
        force_ui,
    ))
}

fn a2ui_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-a2a-extensions", HeaderValue::from_static(A2UI_EXTENSION_URI));
    headers
}

fn send(text: &str, context_id: &str) -> Bytes {
    Bytes::from(
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "message/send",
            "params": {
                "message": {
                    "role": "user",
                    "messageId": "m-1",
                    "contextId": context_id,
                    "parts": [{"kind": "text", "text": text}]
                }
            }
        })
        .to_string(),
    )
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is JSON")
}

#[tokio::test]
async fn send_with_extension_returns_input_required_task() {
    let agent = TestAgent::new(gatherer_script());

    let response = handle_rpc(
        State(state(&agent, false)),
        a2ui_headers(),
        send("What's the weather in Boston?", "ctx-rpc"),
    )
    .await;

    assert_eq!(
        response.headers().get("x-a2a-extensions").and_then(|v| v.to_str().ok()),
        Some(A2UI_EXTENSION_URI)
    );
    let body = body_json(response).await;
    let task = &body["result"];

    assert_eq!(body["id"], 1);
    assert_eq!(task["kind"], "task");
    assert_eq!(task["contextId"], "ctx-rpc");
    assert_eq!(task["status"]["state"], "input-required");
    assert_eq!(task["history"].as_array().map(Vec::len), Some(3));

    let parts = task["status"]["message"]["parts"].as_array().expect("parts");
    assert_eq!(parts[0]["kind"], "text");
    assert!(
        parts[1..]
            .iter()
            .all(|part| part["metadata"]["mimeType"] == A2UI_MIME_TYPE)
    );
    assert_eq!(parts[1]["data"]["beginRendering"]["surfaceId"], "weather-confirmation");
}

#[tokio::test]
async fn send_without_extension_completes_with_text() {
    let agent = TestAgent::new(gatherer_script());

    let response = handle_rpc(
        State(state(&agent, false)),
        HeaderMap::new(),
        send("What's the weather in Boston?", "ctx-text"),
    )
    .await;

    assert!(response.headers().get("x-a2a-extensions").is_none());
    let body = body_json(response).await;
    assert_eq!(body["result"]["status"]["state"], "completed");
    assert_eq!(
        body["result"]["status"]["message"]["parts"][0]["text"],
        "I found Boston. Please choose what you would like to see."
    );
}

#[tokio::test]
async fn force_ui_activates_extension_without_header() {
    let agent = TestAgent::new(gatherer_script());

    let response = handle_rpc(
        State(state(&agent, true)),
        HeaderMap::new(),
        send("Boston", "ctx-forced"),
    )
    .await;

    let body = body_json(response).await;
    assert_eq!(body["result"]["status"]["state"], "input-required");
}

#[tokio::test]
async fn empty_message_asks_for_location() {
    let agent = TestAgent::new(Vec::new());

    let response = handle_rpc(State(state(&agent, false)), HeaderMap::new(), send("  ", "c")).await;

    let body = body_json(response).await;
    assert_eq!(body["result"]["status"]["state"], "completed");
    assert_eq!(
        body["result"]["status"]["message"]["parts"][0]["text"],
        EMPTY_TURN_TEXT
    );
}

#[tokio::test]
async fn stream_emits_status_updates_until_final() {
    let agent = TestAgent::new(gatherer_script());
    let request = json!({
        "jsonrpc": "2.0",
        "id": "s-1",
        "method": "message/stream",
        "params": {
            "message": {
                "contextId": "ctx-stream",
                "parts": [{"kind": "text", "text": "What's the weather in Boston?"}]
            }
        }
    });

    let response = handle_rpc(
        State(state(&agent, false)),
        HeaderMap::new(),
        Bytes::from(request.to_string()),
    )
    .await;
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("stream body readable");
    let text = String::from_utf8(bytes.to_vec()).expect("utf-8 body");

    let events: Vec<Value> = text
        .lines()
        .filter_map(|line| line.strip_prefix("data: "))
        .map(|data| serde_json::from_str(data).expect("event is JSON"))
        .collect();

    assert_eq!(events.len(), 4);
    assert!(events.iter().all(|e| e["result"]["kind"] == "status-update"));
    assert!(events.iter().all(|e| e["id"] == "s-1"));
    assert!(events[..3].iter().all(|e| e["result"]["final"] == false));
    let last = &events[3]["result"];
    assert_eq!(last["final"], true);
    assert_eq!(last["status"]["state"], "completed");
    assert_eq!(last["contextId"], "ctx-stream");
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let agent = TestAgent::new(Vec::new());

    let response = handle_rpc(
        State(state(&agent, false)),
        HeaderMap::new(),
        Bytes::from_static(b"{not json"),
    )
    .await;

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], -32700);
    assert_eq!(body["id"], Value::Null);
}

#[tokio::test]
async fn unknown_method_and_bad_params_use_standard_codes() {
    let agent = TestAgent::new(Vec::new());
    let state = state(&agent, false);

    let unknown = json!({"jsonrpc": "2.0", "id": 7, "method": "tasks/cancel"});
    let body = body_json(
        handle_rpc(
            State(Arc::clone(&state)),
            HeaderMap::new(),
            Bytes::from(unknown.to_string()),
        )
        .await,
    )
    .await;
    assert_eq!(body["error"]["code"], -32601);
    assert_eq!(body["id"], 7);

    let bad_params = json!({"jsonrpc": "2.0", "id": 8, "method": "message/send", "params": {}});
    let body = body_json(
        handle_rpc(
            State(Arc::clone(&state)),
            HeaderMap::new(),
            Bytes::from(bad_params.to_string()),
        )
        .await,
    )
    .await;
    assert_eq!(body["error"]["code"], -32602);

    let wrong_version = json!({"jsonrpc": "1.0", "id": 9, "method": "message/send"});
    let body = body_json(
        handle_rpc(State(state), HeaderMap::new(), Bytes::from(wrong_version.to_string())).await,
    )
    .await;
    assert_eq!(body["error"]["code"], -32600);
}

#[test]
fn extension_header_accepts_lists() {
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-a2a-extensions",
        HeaderValue::from_str(&format!("https://example.com/other, {A2UI_EXTENSION_URI}")).unwrap(),
    );
    assert!(extension_requested(&headers));
    assert!(!extension_requested(&HeaderMap::new()));
}

#[test]
fn agent_card_advertises_a2ui_extension() {
    let card = serde_json::to_value(AgentCard::weather("http://localhost:10002/")).unwrap();

    assert_eq!(card["name"], "Weather Agent");
    assert_eq!(card["capabilities"]["streaming"], true);
    assert_eq!(card["capabilities"]["extensions"][0]["uri"], A2UI_EXTENSION_URI);
    assert_eq!(card["skills"][0]["id"], "weather_info");
    assert_eq!(card["url"], "http://localhost:10002/");
}
