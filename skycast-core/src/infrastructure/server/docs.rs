use super::dto::{ErrorResponse, RestChatRequest, RestChatResponse};
use super::routes;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::chat::chat_handler,
        routes::card::agent_card_handler
    ),
    components(
        schemas(
            RestChatRequest,
            RestChatResponse,
            ErrorResponse,
            routes::card::AgentCard,
            routes::card::AgentSkill,
            routes::card::AgentCapabilities,
            routes::card::AgentExtension
        )
    ),
    tags(
        (name = "chat", description = "Weather conversations without the A2A envelope"),
        (name = "agent", description = "A2A discovery")
    )
)]
pub(super) struct ApiDoc;
