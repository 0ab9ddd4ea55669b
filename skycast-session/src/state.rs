use crate::message::ChatMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Location parameters the gatherer resolved and the user still has to confirm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingConfirmation {
    pub request: ConfirmationRequest,
    /// Set once the confirmation surface has been sent to the client.
    #[serde(default)]
    pub rendered: bool,
    pub requested_at: DateTime<Utc>,
}

/// Where a conversation stands in the confirmation hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationPhase {
    AwaitingQuery,
    AwaitingConfirmation,
    Fetching,
    Rejected,
}

impl fmt::Display for ConfirmationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfirmationPhase::AwaitingQuery => "awaiting_query",
            ConfirmationPhase::AwaitingConfirmation => "awaiting_confirmation",
            ConfirmationPhase::Fetching => "fetching",
            ConfirmationPhase::Rejected => "rejected",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationState {
    pub id: String,
    #[serde(default)]
    histories: BTreeMap<String, Vec<ChatMessage>>,
    #[serde(default)]
    pending: Option<PendingConfirmation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            histories: BTreeMap::new(),
            pending: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Turn history recorded by one agent. Empty when the agent has not spoken yet.
    pub fn history(&self, agent: &str) -> &[ChatMessage] {
        self.histories
            .get(agent)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn record_exchange(
        &mut self,
        agent: &str,
        user: impl Into<String>,
        assistant: impl Into<String>,
    ) {
        let history = self.histories.entry(agent.to_string()).or_default();
        history.push(ChatMessage::user(user));
        history.push(ChatMessage::assistant(assistant));
        self.touch();
    }

    /// Stores a new pending request and hands back the one it displaced, if any.
    pub fn set_pending(&mut self, request: ConfirmationRequest) -> Option<ConfirmationRequest> {
        let displaced = self.pending.take().map(|pending| pending.request);
        self.pending = Some(PendingConfirmation {
            request,
            rendered: false,
            requested_at: Utc::now(),
        });
        self.touch();
        displaced
    }

    pub fn pending(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    /// Removes the pending request. A second call returns `None`.
    pub fn take_pending(&mut self) -> Option<ConfirmationRequest> {
        let taken = self.pending.take().map(|pending| pending.request);
        if taken.is_some() {
            self.touch();
        }
        taken
    }

    /// Marks a freshly written request as rendered and returns it. Requests that
    /// were already shown to the user are left alone.
    pub fn claim_unrendered(&mut self) -> Option<ConfirmationRequest> {
        let pending = self.pending.as_mut().filter(|pending| !pending.rendered)?;
        pending.rendered = true;
        let request = pending.request.clone();
        self.touch();
        Some(request)
    }

    /// Drops a request that was never shown to the user. Rendered requests stay
    /// until the user confirms or rejects them.
    pub fn discard_unrendered(&mut self) -> Option<ConfirmationRequest> {
        if self.pending.as_ref().is_some_and(|pending| pending.rendered) {
            return None;
        }
        self.take_pending()
    }

    pub fn phase(&self) -> ConfirmationPhase {
        if self.pending.is_some() {
            ConfirmationPhase::AwaitingConfirmation
        } else {
            ConfirmationPhase::AwaitingQuery
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
