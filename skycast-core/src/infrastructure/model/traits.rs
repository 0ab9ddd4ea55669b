use super::factory::BackendKind;
use super::types::{ModelError, ModelRequest, ModelResponse};
use async_trait::async_trait;

/// What the agents talk to: routes a chat request by `request.provider`.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}

/// One configured backend endpoint.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Provider id from `[[providers]]`.
    fn id(&self) -> &str;

    fn kind(&self) -> BackendKind;

    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;
}
