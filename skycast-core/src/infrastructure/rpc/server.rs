use crate::constants::{A2UI_EXTENSION_URI, EXTENSIONS_HEADER};
use crate::dispatch::InboundTurn;
use crate::domain::a2a::{TaskState, TaskUpdate};
use crate::domain::events::TurnEvents;
use crate::rpc::types::{
    INTERNAL_ERROR, INVALID_PARAMS, MessageSendParams, RpcRequest, RpcResponse, Task, TaskHandle,
};
use crate::server::ServerState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, error, info, warn};

/// JSON-RPC entry point for A2A `message/send` and `message/stream`.
pub async fn handle_rpc(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let raw: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "Rejecting unparsable JSON-RPC body");
            return Json(RpcResponse::parse_error(format!("Parse error: {err}"))).into_response();
        }
    };
    let request: RpcRequest = match serde_json::from_value(raw) {
        Ok(request) => request,
        Err(err) => {
            return Json(RpcResponse::invalid_request(format!("Invalid request: {err}")))
                .into_response();
        }
    };

    debug!(method = %request.method, "Received JSON-RPC request");

    if request.jsonrpc != "2.0" {
        return Json(RpcResponse::invalid_request(
            "Unsupported jsonrpc version (expected 2.0)",
        ))
        .into_response();
    }

    let ui_active = state.force_ui() || extension_requested(&headers);

    let mut response = match request.method.as_str() {
        "message/send" | "message/stream" => {
            let (turn, handle) = match inbound_turn(&request, ui_active) {
                Ok(prepared) => prepared,
                Err(response) => return Json(response).into_response(),
            };
            if request.method == "message/send" {
                handle_send(&state, request.id, turn, handle).await
            } else {
                handle_stream(&state, request.id, turn, handle)
            }
        }
        other => {
            error!(method = other, "Unknown JSON-RPC method");
            Json(RpcResponse::method_not_found(request.id, other)).into_response()
        }
    };

    if ui_active {
        response.headers_mut().insert(
            EXTENSIONS_HEADER,
            HeaderValue::from_static(A2UI_EXTENSION_URI),
        );
    }
    response
}

/// Whether the client listed the A2UI extension in its extensions header.
pub fn extension_requested(headers: &HeaderMap) -> bool {
    headers
        .get_all(EXTENSIONS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|uri| uri.trim() == A2UI_EXTENSION_URI)
}

fn inbound_turn(
    request: &RpcRequest,
    ui_active: bool,
) -> Result<(InboundTurn, TaskHandle), RpcResponse> {
    let params = request.params.clone().unwrap_or(Value::Null);
    let params: MessageSendParams = serde_json::from_value(params).map_err(|err| {
        RpcResponse::error(
            request.id.clone(),
            INVALID_PARAMS,
            format!("params must carry a message: {err}"),
        )
    })?;

    let message = params.message;
    let context_id = message
        .context_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let task_id = message
        .task_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    info!(
        session_id = %context_id,
        task_id = %task_id,
        ui_active,
        parts = message.parts.len(),
        "Processing A2A message"
    );

    Ok((
        InboundTurn {
            session_id: context_id.clone(),
            parts: message.parts,
            ui_active,
        },
        TaskHandle {
            task_id,
            context_id,
        },
    ))
}

async fn handle_send(
    state: &ServerState,
    id: Option<Value>,
    turn: InboundTurn,
    handle: TaskHandle,
) -> Response {
    let (events, mut receiver) = TurnEvents::channel();
    let terminal = state.router().execute(turn, &events).await;
    drop(events);

    let mut history = Vec::new();
    while let Ok(update) = receiver.try_recv() {
        if update.state == TaskState::Working {
            history.push(handle.status(&update));
        }
    }

    // Nothing actionable: the task keeps waiting on the user.
    let terminal = terminal.unwrap_or_else(|| TaskUpdate::input_required(Vec::new()));
    let task = Task {
        kind: "task",
        id: handle.task_id.clone(),
        context_id: handle.context_id.clone(),
        status: handle.status(&terminal),
        history,
    };

    match serde_json::to_value(&task) {
        Ok(result) => Json(RpcResponse::success(id, result)).into_response(),
        Err(err) => {
            error!(error = %err, "Failed to encode task");
            Json(RpcResponse::error(id, INTERNAL_ERROR, "failed to encode task")).into_response()
        }
    }
}

fn handle_stream(
    state: &ServerState,
    id: Option<Value>,
    turn: InboundTurn,
    handle: TaskHandle,
) -> Response {
    let (events, receiver) = TurnEvents::channel();
    let router = state.router().clone();
    tokio::spawn(async move {
        router.execute(turn, &events).await;
    });

    let stream = UnboundedReceiverStream::new(receiver).map(move |update| {
        let event = handle.status_update(&update);
        let result = serde_json::to_value(&event).unwrap_or(Value::Null);
        Event::default().json_data(RpcResponse::success(id.clone(), result))
    });

    Sse::new(stream)
        .keep_alive(
            KeepAlive::new()
                .interval(Duration::from_secs(15))
                .text("keep-alive"),
        )
        .into_response()
}
