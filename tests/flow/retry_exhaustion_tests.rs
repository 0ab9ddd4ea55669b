// Retry tests - invalid structured replies from the fetcher are retried with a
// corrective prompt and degrade to a plain apology once attempts run out.

#[path = "../common/mod.rs"]
mod common;

use common::{FORECAST_REPLY, TestAgent, gatherer_script, user_action};
use serde_json::json;
use skycast_core::constants::APOLOGY_TEXT;
use skycast_core::domain::a2a::{Part, TaskState};

const SESSION: &str = "ctx-retry";

async fn confirm(agent: &TestAgent) -> skycast_core::domain::a2a::TaskUpdate {
    agent
        .turn(SESSION, vec![Part::text("What's the weather in Boston?")], true)
        .await;
    let (terminal, _) = agent
        .turn(
            SESSION,
            vec![user_action(json!({
                "name": "confirmWeather",
                "context": {"forecastSelected": true}
            }))],
            true,
        )
        .await;
    terminal.expect("fetcher turn produces an update")
}

#[tokio::test]
async fn missing_delimiter_twice_degrades_to_apology() {
    let mut script = gatherer_script();
    script.extend(["Sunny and 59°F in Boston.", "Still sunny and 59°F."]);
    let agent = TestAgent::new(script);

    let terminal = confirm(&agent).await;

    assert_eq!(terminal.state, TaskState::Completed);
    assert!(terminal.is_final());
    assert_eq!(terminal.directive_count(), 0);
    assert_eq!(terminal.text(), APOLOGY_TEXT);

    let prompts = agent.provider.prompts().await;
    assert_eq!(prompts.len(), 5);
    assert!(prompts[4].starts_with("Your previous response was invalid."));
    assert!(prompts[4].contains("---a2ui_JSON---"));
    assert!(prompts[4].contains("Please retry the original request: 'The user has confirmed"));
    assert_eq!(agent.provider.remaining().await, 0);
}

#[tokio::test]
async fn corrective_retry_can_recover() {
    let mut script = gatherer_script();
    script.extend(["Sunny and 59°F in Boston.", FORECAST_REPLY]);
    let agent = TestAgent::new(script);

    let terminal = confirm(&agent).await;

    assert_eq!(terminal.state, TaskState::Completed);
    assert_eq!(terminal.directive_count(), 3);
    assert_eq!(terminal.text(), "Here is the current forecast for Boston.");
}

#[tokio::test]
async fn truncated_payload_is_repaired_without_retry() {
    let truncated = FORECAST_REPLY.trim_end().trim_end_matches(']').trim_end();
    let mut script = gatherer_script();
    script.push(truncated);
    let agent = TestAgent::new(script);

    let terminal = confirm(&agent).await;

    assert_eq!(terminal.directive_count(), 3);
    assert_eq!(agent.provider.prompts().await.len(), 4);
}

#[tokio::test]
async fn schema_violations_are_retried_with_the_violating_path() {
    let invalid = "Forecast below.\n---a2ui_JSON---\n[{\"beginRendering\": {\"root\": \"root\"}}]";
    let mut script = gatherer_script();
    script.extend([invalid, FORECAST_REPLY]);
    let agent = TestAgent::new(script);

    let terminal = confirm(&agent).await;

    assert_eq!(terminal.directive_count(), 3);
    let prompts = agent.provider.prompts().await;
    assert!(prompts[4].contains("A2UI JSON failed schema validation at '/0"));
}

#[tokio::test]
async fn empty_fetcher_reply_gets_no_response_retry() {
    let mut script = gatherer_script();
    script.extend(["   ", FORECAST_REPLY]);
    let agent = TestAgent::new(script);

    let terminal = confirm(&agent).await;

    assert_eq!(terminal.directive_count(), 3);
    let prompts = agent.provider.prompts().await;
    assert!(prompts[4].starts_with("I received no response. Please try again."));
}
