use super::docs::ApiDoc;
use super::error::ServerError;
use super::routes;
use super::state::ServerState;
use crate::constants::EXTENSIONS_HEADER;
use crate::rpc::server::handle_rpc;
use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::routing::{get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub(super) fn build(state: Arc<ServerState>, allowed_origins: &[String]) -> Router {
    let api = ApiDoc::openapi();

    let origins = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(origin = %origin, error = %err, "Skipping invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(EXTENSIONS_HEADER)]);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", api))
        .route("/", post(handle_rpc))
        .route(
            "/.well-known/agent-card.json",
            get(routes::card::agent_card_handler),
        )
        .route("/.well-known/agent.json", get(routes::card::agent_card_handler))
        .route("/chat", post(routes::chat::chat_handler))
        .layer(cors)
        .with_state(state)
}

pub(super) async fn serve(
    state: Arc<ServerState>,
    addr: SocketAddr,
    allowed_origins: &[String],
) -> Result<(), ServerError> {
    info!(%addr, "Binding A2A server");
    let app = build(state, allowed_origins);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;
    info!(%addr, "A2A server ready to accept connections");

    axum::serve(listener, app.into_make_service())
        .await
        .map_err(ServerError::Serve)
}
