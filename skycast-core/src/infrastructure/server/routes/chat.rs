use super::super::dto::{ErrorResponse, RestChatRequest, RestChatResponse};
use super::super::state::ServerState;
use crate::dispatch::InboundTurn;
use crate::domain::a2a::{Part, TaskUpdate};
use crate::domain::events::TurnEvents;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info};

#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body = RestChatRequest,
    responses(
        (status = 200, description = "Turn processed", body = RestChatResponse),
        (status = 400, description = "Neither a prompt nor a user action was given", body = ErrorResponse)
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<ServerState>>,
    Json(payload): Json<RestChatRequest>,
) -> Result<Json<RestChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    info!(
        session = payload.session_id.as_deref(),
        ui = payload.ui,
        "Received /chat request"
    );

    let mut parts = Vec::new();
    if let Some(prompt) = payload.prompt.filter(|prompt| !prompt.trim().is_empty()) {
        parts.push(Part::text(prompt));
    }
    if let Some(action) = payload.user_action {
        parts.push(Part::Data {
            data: json!({ "userAction": action }),
            metadata: None,
        });
    }
    if parts.is_empty() {
        error!("Rejecting /chat request without prompt or user action");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "prompt or user_action is required".to_string(),
            }),
        ));
    }

    let session_id = payload
        .session_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let turn = InboundTurn {
        session_id: session_id.clone(),
        parts,
        ui_active: payload.ui || state.force_ui(),
    };

    let (events, _receiver) = TurnEvents::channel();
    let update = state
        .router()
        .execute(turn, &events)
        .await
        .unwrap_or_else(|| TaskUpdate::input_required(Vec::new()));

    let directives = update
        .parts
        .iter()
        .filter(|part| part.is_a2ui())
        .filter_map(Part::as_data)
        .cloned()
        .collect::<Vec<Value>>();

    Ok(Json(RestChatResponse {
        session_id,
        state: update.state.as_str().to_string(),
        content: update.text(),
        directives,
    }))
}
