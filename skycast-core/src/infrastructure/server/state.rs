use super::routes::card::AgentCard;
use crate::dispatch::DispatchRouter;

pub struct ServerState {
    router: DispatchRouter,
    card: AgentCard,
    force_ui: bool,
}

impl ServerState {
    pub fn new(router: DispatchRouter, card: AgentCard, force_ui: bool) -> Self {
        Self {
            router,
            card,
            force_ui,
        }
    }

    pub fn router(&self) -> &DispatchRouter {
        &self.router
    }

    pub fn card(&self) -> &AgentCard {
        &self.card
    }

    /// Every request renders A2UI, regardless of the extensions header.
    pub fn force_ui(&self) -> bool {
        self.force_ui
    }
}
