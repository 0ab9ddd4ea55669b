use super::action::{Selections, UserAction};
use serde_json::Value;
use skycast_session::ConfirmationRequest;

/// The synthetic query handed to the fetcher once the user confirmed. Only
/// the selected retrieval operations are named.
pub fn fetcher_instruction(request: &ConfirmationRequest, selections: Selections) -> String {
    let state_code = request.state_code.as_deref().unwrap_or("");
    let mut query = format!(
        "The user has confirmed they want weather information for {name}.\n\
         Location: {name}\n\
         Coordinates: latitude={lat}, longitude={lon}\n\
         State Code: {state_code}\n\
         User selected: {selected}\n\
         \n\
         YOU MUST:",
        name = request.display_name,
        lat = request.latitude,
        lon = request.longitude,
        selected = selections.labels().join(" and "),
    );

    let mut step = 1;
    if selections.forecast {
        query.push_str(&format!(
            "\n{step}. Call get_forecast({}, {}) to get forecast data",
            request.latitude, request.longitude
        ));
        step += 1;
    }
    if selections.alerts {
        query.push_str(&format!(
            "\n{step}. Call get_alerts('{state_code}') to get weather alerts"
        ));
    }

    query.push_str("\n\nThen present ALL the data you receive.");
    query
}

/// Textual form of an action the router has no dedicated handling for.
pub fn event_description(name: &str, action: &UserAction) -> String {
    let context = Value::Object(action.context.clone());
    format!("User submitted an event: {name} with data: {context}")
}
