use crate::error::StateAccessError;
use crate::state::ConversationState;
use async_trait::async_trait;

/// Persistence for conversation state keyed by conversation id.
///
/// `load` never fails for an unknown id; it hands back a fresh state instead.
/// Writes for one id are expected to come from a single turn at a time.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<ConversationState, StateAccessError>;

    async fn save(&self, state: &ConversationState) -> Result<(), StateAccessError>;
}

/// Loads a conversation, applies `mutate` and writes the result back.
pub async fn modify<S, F, R>(store: &S, id: &str, mutate: F) -> Result<R, StateAccessError>
where
    S: ConversationStore + ?Sized,
    F: FnOnce(&mut ConversationState) -> R + Send,
    R: Send,
{
    let mut state = store.load(id).await?;
    let result = mutate(&mut state);
    store.save(&state).await?;
    Ok(result)
}
