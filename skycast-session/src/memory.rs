use crate::error::StateAccessError;
use crate::state::ConversationState;
use crate::store::ConversationStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

/// Process-lifetime store. Conversations are never evicted.
#[derive(Default)]
pub struct MemoryConversationStore {
    conversations: Mutex<HashMap<String, ConversationState>>,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.conversations.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.conversations.lock().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn load(&self, id: &str) -> Result<ConversationState, StateAccessError> {
        let conversations = self.conversations.lock().await;
        match conversations.get(id) {
            Some(state) => Ok(state.clone()),
            None => {
                debug!(session_id = id, "Starting new conversation state");
                Ok(ConversationState::new(id))
            }
        }
    }

    async fn save(&self, state: &ConversationState) -> Result<(), StateAccessError> {
        let mut conversations = self.conversations.lock().await;
        conversations.insert(state.id.clone(), state.clone());
        Ok(())
    }
}
