//! Conversation-scoped state for the Skycast agents.
//!
//! A conversation owns the per-agent turn histories and at most one pending
//! [`ConfirmationRequest`]. Stores are injected behind [`ConversationStore`]
//! so the dispatch layer never touches ambient globals.

mod error;
mod file;
mod memory;
mod message;
mod state;
mod store;

pub use error::StateAccessError;
pub use file::FileConversationStore;
pub use memory::MemoryConversationStore;
pub use message::{ChatMessage, MessageRole};
pub use state::{ConfirmationPhase, ConfirmationRequest, ConversationState, PendingConfirmation};
pub use store::{ConversationStore, modify};
