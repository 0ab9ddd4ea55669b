use super::agent::{Agent, AgentReply};
use super::roster::AgentRoster;
use crate::confirmation::{
    ActionKind, Selections, UserAction, confirmation_parts, event_description,
    fetcher_instruction,
};
use crate::constants::{EMPTY_TURN_TEXT, REJECTION_TEXT};
use crate::domain::a2a::{Part, TaskUpdate};
use crate::domain::events::TurnEvents;
use skycast_session::{
    ConfirmationPhase, ConfirmationRequest, ConversationState, ConversationStore,
    StateAccessError, modify,
};
use std::sync::Arc;
use tracing::{debug, error, info};

/// One inbound user turn.
#[derive(Debug, Clone)]
pub struct InboundTurn {
    pub session_id: String,
    pub parts: Vec<Part>,
    /// Whether the client activated the A2UI extension.
    pub ui_active: bool,
}

impl InboundTurn {
    pub fn query(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Routes inbound turns between the gatherer and the fetchers and owns the
/// confirmation hand-off.
#[derive(Clone)]
pub struct DispatchRouter {
    roster: AgentRoster,
    store: Arc<dyn ConversationStore>,
}

impl DispatchRouter {
    pub fn new(roster: AgentRoster, store: Arc<dyn ConversationStore>) -> Self {
        Self { roster, store }
    }

    pub fn store(&self) -> &Arc<dyn ConversationStore> {
        &self.store
    }

    /// Processes one turn. Every update, including the terminal one, is emitted
    /// on `events`; the terminal update is also returned. A turn that carries
    /// nothing actionable returns `None` and emits nothing.
    pub async fn execute(&self, turn: InboundTurn, events: &TurnEvents) -> Option<TaskUpdate> {
        let session_id = turn.session_id.as_str();
        let action = UserAction::from_parts(&turn.parts);

        if let Some(ignored) = action
            .as_ref()
            .filter(|action| action.kind() == ActionKind::Ignored)
        {
            debug!(session_id, name = ?ignored.name, "Ignoring non-actionable user action");
            return None;
        }

        events.working();

        let update = match action {
            Some(action) => self.resume(session_id, &action, turn.ui_active, events).await,
            None => {
                let query = turn.query();
                if query.is_empty() {
                    TaskUpdate::completed(vec![Part::text(EMPTY_TURN_TEXT)])
                } else {
                    self.gather(session_id, &query, turn.ui_active, events).await
                }
            }
        };

        events.emit(update.clone());
        Some(update)
    }

    async fn gather(
        &self,
        session_id: &str,
        query: &str,
        ui_active: bool,
        events: &TurnEvents,
    ) -> TaskUpdate {
        let gatherer = self.roster.gatherer();
        self.discard_unrendered(session_id, "left over from an earlier turn")
            .await;
        info!(session_id, agent = gatherer.name(), "Routing query to gatherer");
        let reply = gatherer.stream(query, session_id, events).await;

        if !ui_active || reply.failure.is_some() {
            self.discard_unrendered(session_id, "no surface will be rendered")
                .await;
        } else {
            match self.claim_confirmation(session_id).await {
                Ok(Some(request)) => {
                    info!(
                        session_id,
                        location = %request.display_name,
                        "Rendering confirmation surface"
                    );
                    log_phase(
                        session_id,
                        ConfirmationPhase::AwaitingQuery,
                        ConfirmationPhase::AwaitingConfirmation,
                    );
                    return TaskUpdate::input_required(confirmation_parts(&request));
                }
                Ok(None) => {}
                Err(err) => {
                    error!(session_id, error = %err, "Failed to inspect confirmation state");
                }
            }
        }

        TaskUpdate::completed(reply.into_parts())
    }

    async fn resume(
        &self,
        session_id: &str,
        action: &UserAction,
        ui_active: bool,
        events: &TurnEvents,
    ) -> TaskUpdate {
        match action.kind() {
            ActionKind::Reject => {
                let pending = self.take_pending(session_id).await;
                log_phase(
                    session_id,
                    phase_of(pending.as_ref()),
                    ConfirmationPhase::Rejected,
                );
                TaskUpdate::completed(vec![Part::text(REJECTION_TEXT)])
            }
            ActionKind::Confirm => {
                let pending = self.take_pending(session_id).await;
                log_phase(
                    session_id,
                    phase_of(pending.as_ref()),
                    ConfirmationPhase::Fetching,
                );
                let request = action.confirmed_request(pending);
                let selections = Selections::from_action(action);
                info!(
                    session_id,
                    location = %request.display_name,
                    forecast = selections.forecast,
                    alerts = selections.alerts,
                    "User confirmed weather request"
                );
                let instruction = fetcher_instruction(&request, selections);
                let reply = self.fetch(session_id, &instruction, ui_active, events).await;
                log_phase(
                    session_id,
                    ConfirmationPhase::Fetching,
                    ConfirmationPhase::AwaitingQuery,
                );
                TaskUpdate::completed(reply.into_parts())
            }
            ActionKind::Other(name) => {
                let description = event_description(&name, action);
                let reply = self.fetch(session_id, &description, ui_active, events).await;
                TaskUpdate::completed(reply.into_parts())
            }
            // Filtered out before any update is emitted.
            ActionKind::Ignored => TaskUpdate::completed(Vec::new()),
        }
    }

    async fn fetch(
        &self,
        session_id: &str,
        query: &str,
        ui_active: bool,
        events: &TurnEvents,
    ) -> AgentReply {
        let fetcher = self.roster.fetcher(ui_active);
        info!(session_id, agent = fetcher.name(), "Routing turn to fetcher");
        fetcher.stream(query, session_id, events).await
    }

    async fn claim_confirmation(
        &self,
        session_id: &str,
    ) -> Result<Option<ConfirmationRequest>, StateAccessError> {
        modify(self.store.as_ref(), session_id, ConversationState::claim_unrendered).await
    }

    /// Drops a pending request the user never saw. State failures are logged.
    async fn discard_unrendered(&self, session_id: &str, reason: &str) {
        match modify(self.store.as_ref(), session_id, ConversationState::discard_unrendered).await {
            Ok(Some(request)) => {
                info!(
                    session_id,
                    location = %request.display_name,
                    reason,
                    "Discarded unrendered confirmation request"
                );
            }
            Ok(None) => {}
            Err(err) => {
                error!(session_id, error = %err, "Failed to clear unrendered confirmation");
            }
        }
    }

    /// Removes the pending request. State failures are logged and read as "none".
    async fn take_pending(&self, session_id: &str) -> Option<ConfirmationRequest> {
        match modify(self.store.as_ref(), session_id, ConversationState::take_pending).await {
            Ok(pending) => pending,
            Err(err) => {
                error!(session_id, error = %err, "Failed to clear pending confirmation");
                None
            }
        }
    }
}

fn phase_of(pending: Option<&ConfirmationRequest>) -> ConfirmationPhase {
    if pending.is_some() {
        ConfirmationPhase::AwaitingConfirmation
    } else {
        ConfirmationPhase::AwaitingQuery
    }
}

fn log_phase(session_id: &str, from: ConfirmationPhase, to: ConfirmationPhase) {
    info!(session_id, from = %from, to = %to, "Confirmation phase changed");
}
