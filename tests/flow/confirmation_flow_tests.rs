// Confirmation flow tests - a query, the confirmation surface and the
// confirmed (or rejected) fetch, run end to end with scripted models.

#[path = "../common/mod.rs"]
mod common;

use common::{FORECAST_REPLY, TestAgent, gatherer_script, user_action};
use serde_json::json;
use skycast_core::a2ui::{ComponentKind, Directive};
use skycast_core::constants::REJECTION_TEXT;
use skycast_core::domain::a2a::{Part, TaskState};

const SESSION: &str = "ctx-boston";

fn confirm_forecast_only() -> Part {
    user_action(json!({
        "actionName": "confirmWeather",
        "context": [
            {"key": "confirmed", "value": "confirmed"},
            {"key": "location", "value": "Boston"},
            {"key": "latitude", "value": 42.3554},
            {"key": "longitude", "value": -71.0605},
            {"key": "display_name", "value": "Boston, Suffolk County, Massachusetts, United States"},
            {"key": "state_code", "value": "MA"},
            {"key": "forecastSelected", "value": true},
            {"key": "alertsSelected", "value": false}
        ]
    }))
}

#[tokio::test]
async fn boston_query_renders_confirmation_surface() {
    let agent = TestAgent::new(gatherer_script());

    let (terminal, updates) = agent
        .turn(SESSION, vec![Part::text("What's the weather in Boston?")], true)
        .await;
    let terminal = terminal.expect("gatherer turn produces an update");

    assert_eq!(terminal.state, TaskState::InputRequired);
    assert!(!terminal.is_final());
    assert!(
        terminal
            .text()
            .contains("What information would you like to get for Boston")
    );

    let directives: Vec<Directive> = terminal
        .parts
        .iter()
        .filter(|part| part.is_a2ui())
        .filter_map(Part::as_data)
        .map(|data| serde_json::from_value(data.clone()).expect("directive part"))
        .collect();
    assert_eq!(directives.len(), 3);
    assert!(directives.iter().all(|d| d.surface_id() == "weather-confirmation"));

    let Directive::SurfaceUpdate(surface) = &directives[1] else {
        panic!("second directive should be the surface update");
    };
    let toggles = surface
        .components
        .iter()
        .filter(|c| matches!(c.component, ComponentKind::CheckBox(_)))
        .count();
    let mut actions: Vec<&str> = surface
        .components
        .iter()
        .filter_map(|c| match &c.component {
            ComponentKind::Button(button) => Some(button.action.name.as_str()),
            _ => None,
        })
        .collect();
    actions.sort_unstable();
    assert_eq!(toggles, 2);
    assert_eq!(actions, vec!["confirmWeather", "rejectWeather"]);

    // working (turn start) + one per tool call, then the terminal update
    assert_eq!(updates.len(), 4);
    assert!(updates[..3].iter().all(|u| u.state == TaskState::Working));
    assert_eq!(agent.weather.calls().await, vec!["geocode_location(Boston)"]);
}

#[tokio::test]
async fn confirming_forecast_only_fetches_forecast_and_renders_it() {
    let mut script = gatherer_script();
    script.extend([
        r#"{"action":"call_tool","tool":"get_forecast","input":{"latitude":42.3554,"longitude":-71.0605}}"#,
        FORECAST_REPLY,
    ]);
    let agent = TestAgent::new(script);

    agent
        .turn(SESSION, vec![Part::text("What's the weather in Boston?")], true)
        .await;
    let (terminal, _) = agent.turn(SESSION, vec![confirm_forecast_only()], true).await;
    let terminal = terminal.expect("fetcher turn produces an update");

    assert_eq!(terminal.state, TaskState::Completed);
    assert!(terminal.is_final());
    assert_eq!(terminal.text(), "Here is the current forecast for Boston.");
    assert_eq!(terminal.directive_count(), 3);

    let prompts = agent.provider.prompts().await;
    let instruction = &prompts[3];
    assert!(instruction.contains("get_forecast(42.3554, -71.0605)"));
    assert!(!instruction.contains("get_alerts"));

    assert_eq!(
        agent.weather.calls().await,
        vec!["geocode_location(Boston)", "get_forecast(42.3554, -71.0605)"]
    );

    let state = agent.store.load(SESSION).await.unwrap();
    assert!(state.pending().is_none());
    assert_eq!(state.history("weather_agent_ui").len(), 2);
    assert_eq!(state.history("confirmation_agent").len(), 2);
}

#[tokio::test]
async fn confirming_with_no_selection_defaults_to_forecast() {
    let mut script = gatherer_script();
    script.push(FORECAST_REPLY);
    let agent = TestAgent::new(script);

    agent
        .turn(SESSION, vec![Part::text("Weather in Boston please")], true)
        .await;
    agent
        .turn(
            SESSION,
            vec![user_action(json!({
                "name": "confirmWeather",
                "context": {
                    "forecastSelected": {"path": "/form/forecastSelected"},
                    "alertsSelected": "false"
                }
            }))],
            true,
        )
        .await;

    let prompts = agent.provider.prompts().await;
    let instruction = &prompts[3];
    assert!(instruction.contains("User selected: forecast\n"));
    assert!(instruction.contains("get_forecast(42.3554, -71.0605)"));
    assert!(!instruction.contains("get_alerts"));
}

#[tokio::test]
async fn confirming_alerts_only_names_the_state() {
    let mut script = gatherer_script();
    script.extend([
        r#"{"action":"call_tool","tool":"get_alerts","input":{"state":"MA"}}"#,
        FORECAST_REPLY,
    ]);
    let agent = TestAgent::new(script);

    agent
        .turn(SESSION, vec![Part::text("Any alerts in Boston?")], true)
        .await;
    agent
        .turn(
            SESSION,
            vec![user_action(json!({
                "name": "confirmWeather",
                "context": {"forecastSelected": false, "alertsSelected": true}
            }))],
            true,
        )
        .await;

    let prompts = agent.provider.prompts().await;
    assert!(prompts[3].contains("get_alerts('MA')"));
    assert!(!prompts[3].contains("get_forecast"));
    assert_eq!(agent.weather.calls().await.last().map(String::as_str), Some("get_alerts(MA)"));
}

#[tokio::test]
async fn rejecting_completes_without_retrieval() {
    let agent = TestAgent::new(gatherer_script());

    agent
        .turn(SESSION, vec![Part::text("What's the weather in Boston?")], true)
        .await;
    let calls_before = agent.weather.calls().await.len();
    let requests_before = agent.provider.requests().await.len();

    let (terminal, _) = agent
        .turn(
            SESSION,
            vec![user_action(json!({
                "name": "rejectWeather",
                "context": [{"key": "confirmed", "value": {"literalString": "rejected"}}]
            }))],
            true,
        )
        .await;
    let terminal = terminal.expect("reject produces an update");

    assert_eq!(terminal.state, TaskState::Completed);
    assert_eq!(terminal.text(), REJECTION_TEXT);
    assert_eq!(terminal.directive_count(), 0);
    assert_eq!(agent.weather.calls().await.len(), calls_before);
    assert_eq!(agent.provider.requests().await.len(), requests_before);

    let state = agent.store.load(SESSION).await.unwrap();
    assert!(state.pending().is_none());
}

#[tokio::test]
async fn text_clients_get_the_gatherer_reply() {
    let agent = TestAgent::new(gatherer_script());

    let (terminal, _) = agent
        .turn(SESSION, vec![Part::text("What's the weather in Boston?")], false)
        .await;
    let terminal = terminal.expect("gatherer turn produces an update");

    assert_eq!(terminal.state, TaskState::Completed);
    assert_eq!(terminal.directive_count(), 0);
    assert_eq!(
        terminal.text(),
        "I found Boston. Please choose what you would like to see."
    );
}
