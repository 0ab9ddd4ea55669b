//! Confirmation hand-off between the gatherer and the fetcher: the rendered
//! surface, the user actions it produces and the instruction that follows.

mod action;
mod instruction;
mod surface;

pub use action::{ActionKind, Selections, UserAction};
pub use instruction::{event_description, fetcher_instruction};
pub use surface::{
    ALERTS_SELECTED_PATH, CONFIRM_ACTION, CONFIRMATION_SURFACE_ID, FORECAST_SELECTED_PATH,
    REJECT_ACTION, confirmation_parts, confirmation_prompt, confirmation_surface,
};
