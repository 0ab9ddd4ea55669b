pub use skycast_session::{ChatMessage, MessageRole};
