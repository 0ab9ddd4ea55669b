use super::directive::{AgentDirective, parse_agent_action};
use super::errors::AgentError;
use super::tools::{ToolExecution, WeatherTool, WeatherToolbox};
use crate::domain::events::TurnEvents;
use crate::model::{ModelProvider, ModelRequest};
use crate::types::ChatMessage;
use async_trait::async_trait;
use serde_json::Value;
use skycast_session::{ConversationStore, modify};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Maximum corrective re-prompts for a malformed action object.
const MAX_JSON_RETRIES: u8 = 1;

const JSON_RETRY_MESSAGE: &str = "Your previous reply was not a valid action. Reply with either \
{\"action\":\"call_tool\",\"tool\":\"tool_name\",\"input\":{...}} or your final answer.";

/// Produces one raw reply for a prompt within a conversation.
///
/// `Ok(None)` means the model produced nothing at all.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        session_id: &str,
        prompt: &str,
        events: &TurnEvents,
    ) -> Result<Option<String>, AgentError>;
}

/// Name, instructions and tools of one agent.
#[derive(Debug, Clone)]
pub struct AgentProfile {
    pub name: &'static str,
    pub instructions: String,
    pub tools: &'static [WeatherTool],
}

/// Which backend and model an agent talks to.
#[derive(Debug, Clone)]
pub struct ModelSelection {
    pub provider: String,
    pub model: String,
}

/// A model-driven tool loop whose history lives in the conversation store.
pub struct ToolAgent<P: ModelProvider> {
    profile: AgentProfile,
    provider: Arc<P>,
    selection: ModelSelection,
    toolbox: WeatherToolbox,
    store: Arc<dyn ConversationStore>,
    max_steps: usize,
}

impl<P: ModelProvider> ToolAgent<P> {
    pub fn new(
        profile: AgentProfile,
        provider: Arc<P>,
        selection: ModelSelection,
        toolbox: WeatherToolbox,
        store: Arc<dyn ConversationStore>,
        max_steps: usize,
    ) -> Self {
        Self {
            profile,
            provider,
            selection,
            toolbox,
            store,
            max_steps,
        }
    }

    pub fn name(&self) -> &'static str {
        self.profile.name
    }

    async fn complete(
        &self,
        session_id: &str,
        transcript: &[ChatMessage],
    ) -> Result<String, AgentError> {
        let response = self
            .provider
            .chat(ModelRequest {
                provider: self.selection.provider.clone(),
                model: self.selection.model.clone(),
                messages: transcript.to_vec(),
                session_id: Some(session_id.to_string()),
            })
            .await?;
        if response.is_truncated() {
            warn!(
                agent = self.profile.name,
                session_id,
                chars = response.message.content.len(),
                "Model reply hit the output limit"
            );
        }
        Ok(response.message.content)
    }

    async fn parse_with_retry(
        &self,
        session_id: &str,
        transcript: &mut Vec<ChatMessage>,
        content: String,
    ) -> Result<AgentDirective, AgentError> {
        let mut retry_count = 0u8;
        let mut current = content;

        loop {
            match parse_agent_action(&current) {
                Ok(directive) => return Ok(directive),
                Err(err) if retry_count < MAX_JSON_RETRIES => {
                    retry_count += 1;
                    warn!(
                        agent = self.profile.name,
                        attempt = retry_count,
                        error = %err,
                        "Malformed action, requesting correction from model"
                    );
                    transcript.push(ChatMessage::assistant(current));
                    transcript.push(ChatMessage::user(format!(
                        "{JSON_RETRY_MESSAGE}\n\nError details: {err}"
                    )));
                    current = self.complete(session_id, transcript).await?;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn run_tool(
        &self,
        session_id: &str,
        tool: String,
        input: Value,
    ) -> Result<ToolExecution, AgentError> {
        let result = self
            .toolbox
            .execute(self.profile.name, self.profile.tools, session_id, &tool, input.clone())
            .await;

        match result {
            Ok(output) => Ok(ToolExecution {
                tool,
                input,
                success: true,
                output,
                message: None,
            }),
            Err(err) if err.is_recoverable() => {
                warn!(agent = self.profile.name, tool = tool.as_str(), error = %err, "Tool call failed");
                Ok(ToolExecution {
                    tool,
                    input,
                    success: false,
                    output: Value::Null,
                    message: Some(err.to_string()),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn persist_exchange(&self, session_id: &str, prompt: &str, reply: &str) {
        let agent = self.profile.name;
        let stored = modify(self.store.as_ref(), session_id, |state| {
            state.record_exchange(agent, prompt, reply);
        })
        .await;
        match stored {
            Ok(()) => debug!(agent, session_id, "Persisted exchange to conversation history"),
            Err(err) => error!(agent, session_id, error = %err, "Failed to persist exchange"),
        }
    }
}

#[async_trait]
impl<P: ModelProvider> Generator for ToolAgent<P> {
    async fn generate(
        &self,
        session_id: &str,
        prompt: &str,
        events: &TurnEvents,
    ) -> Result<Option<String>, AgentError> {
        let agent = self.profile.name;
        let state = self.store.load(session_id).await?;
        let history = state.history(agent);

        let mut transcript = Vec::with_capacity(history.len() + 2);
        transcript.push(ChatMessage::system(self.profile.instructions.clone()));
        transcript.extend(history.iter().cloned());
        transcript.push(ChatMessage::user(prompt));
        debug!(agent, session_id, history = history.len(), "Starting agent turn");

        let mut remaining_steps = self.max_steps;
        loop {
            let content = self.complete(session_id, &transcript).await?;
            if content.trim().is_empty() {
                info!(agent, session_id, "Model returned no content");
                return Ok(None);
            }

            match self.parse_with_retry(session_id, &mut transcript, content).await? {
                AgentDirective::Final { response } => {
                    if response.is_empty() {
                        return Ok(None);
                    }
                    info!(agent, session_id, "Agent returned final response");
                    self.persist_exchange(session_id, prompt, &response).await;
                    return Ok(Some(response));
                }
                AgentDirective::CallTool { tool, input } => {
                    if remaining_steps == 0 {
                        warn!(agent, session_id, "Agent exceeded max tool interactions");
                        return Err(AgentError::StepLimit {
                            limit: self.max_steps,
                        });
                    }
                    remaining_steps -= 1;
                    events.working();

                    let call = serde_json::json!({
                        "action": "call_tool",
                        "tool": tool,
                        "input": input,
                    });
                    transcript.push(ChatMessage::assistant(call.to_string()));

                    let execution = self.run_tool(session_id, tool, input).await?;
                    info!(
                        agent,
                        tool = execution.tool.as_str(),
                        success = execution.success,
                        "Tool executed"
                    );
                    transcript.push(ChatMessage::user(execution.to_prompt()));
                }
            }
        }
    }
}
