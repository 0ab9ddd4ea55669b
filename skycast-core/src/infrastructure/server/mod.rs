mod docs;
mod dto;
mod error;
mod router;
pub mod routes;
mod state;

pub use dto::{ErrorResponse, RestChatRequest, RestChatResponse};
pub use error::ServerError;
pub use routes::card::AgentCard;
pub use state::ServerState;

use crate::config::ServerSettings;
use crate::dispatch::DispatchRouter;
use std::net::SocketAddr;
use std::sync::Arc;

pub async fn serve(router: DispatchRouter, settings: &ServerSettings) -> Result<(), ServerError> {
    let addr: SocketAddr = settings
        .bind
        .parse()
        .map_err(|source| ServerError::Address {
            addr: settings.bind.clone(),
            source,
        })?;
    let card = AgentCard::weather(settings.public_url());
    let state = Arc::new(ServerState::new(router, card, settings.force_ui));
    router::serve(state, addr, &settings.allowed_origins).await
}
