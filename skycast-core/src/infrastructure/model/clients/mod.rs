//! HTTP clients, one per wire protocol. Each parses its own reply envelope
//! into text plus a [`StopReason`](super::StopReason).

mod base;
mod gemini;
mod ollama;
mod openai;

pub use base::HttpClientBase;
pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use openai::OpenAIClient;
