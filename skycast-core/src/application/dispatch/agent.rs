use crate::a2ui::DirectiveBatch;
use crate::agent::Generator;
use crate::constants::NO_RESPONSE_TEXT;
use crate::domain::a2a::Part;
use crate::domain::events::TurnEvents;
use crate::generation::{GenerationFailure, LoopOutcome, RetryLoop};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Final content of one agent turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub text: String,
    pub batch: Option<DirectiveBatch>,
    /// Set when the reply is the fixed apology after exhausted retries.
    pub failure: Option<GenerationFailure>,
}

impl AgentReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            batch: None,
            failure: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.batch.as_ref().is_none_or(DirectiveBatch::is_empty)
    }

    /// Text part first, then one part per directive.
    pub fn into_parts(self) -> Vec<Part> {
        if self.is_empty() {
            return vec![Part::text(NO_RESPONSE_TEXT)];
        }
        let mut parts = Vec::new();
        let text = self.text.trim();
        if !text.is_empty() {
            parts.push(Part::text(text));
        }
        if let Some(batch) = &self.batch {
            parts.extend(Part::directives(batch.directives()));
        }
        parts
    }
}

/// One conversational agent as the router sees it.
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;

    /// Runs one turn. Progress goes to `events`; the returned reply is final.
    async fn stream(&self, query: &str, session_id: &str, events: &TurnEvents) -> AgentReply;
}

/// A generator driven through the retry loop.
pub struct ReplyAgent {
    name: String,
    generator: Arc<dyn Generator>,
    retry: RetryLoop,
}

impl ReplyAgent {
    pub fn new(name: impl Into<String>, generator: Arc<dyn Generator>, retry: RetryLoop) -> Self {
        Self {
            name: name.into(),
            generator,
            retry,
        }
    }
}

#[async_trait]
impl Agent for ReplyAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn stream(&self, query: &str, session_id: &str, events: &TurnEvents) -> AgentReply {
        let run = self
            .retry
            .run(self.generator.as_ref(), session_id, query, events)
            .await;

        match run.outcome {
            LoopOutcome::Accepted(reply) => AgentReply {
                text: reply.text,
                batch: reply.batch,
                failure: None,
            },
            LoopOutcome::Exhausted { ref last } => {
                warn!(
                    agent = %self.name,
                    session_id,
                    attempts = run.attempts,
                    last = %last,
                    "Agent exhausted its attempts"
                );
                AgentReply {
                    text: run.reply_text().to_string(),
                    batch: None,
                    failure: run.failure(),
                }
            }
        }
    }
}
