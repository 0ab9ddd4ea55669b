use super::a2a::TaskUpdate;
use tokio::sync::mpsc;
use tracing::debug;

/// Outbound status updates for the turn currently being processed.
#[derive(Clone)]
pub struct TurnEvents {
    sender: mpsc::UnboundedSender<TaskUpdate>,
}

impl TurnEvents {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TaskUpdate>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Progress signal with no payload.
    pub fn working(&self) {
        self.emit(TaskUpdate::working());
    }

    pub fn emit(&self, update: TaskUpdate) {
        if self.sender.send(update).is_err() {
            debug!("Turn listener went away; dropping status update");
        }
    }
}
