// Shared fixtures for the integration tests.
//
// A scripted model provider and a recording weather service so that whole
// turns run without any network access.

#![allow(dead_code)]

use async_trait::async_trait;
use skycast_core::agent::WeatherToolbox;
use skycast_core::config::AppConfig;
use skycast_core::dispatch::{AgentRoster, DispatchRouter, InboundTurn};
use skycast_core::model::{ModelError, ModelProvider, ModelRequest, ModelResponse};
use skycast_core::domain::a2a::{Part, TaskUpdate};
use skycast_core::domain::events::TurnEvents;
use skycast_core::weather::{
    AlertSummary, Conditions, Forecast, GeocodedLocation, WeatherAlert, WeatherError,
    WeatherService,
};
use serde_json::{Value, json};
use skycast_session::{ConversationStore, MemoryConversationStore};
use std::sync::Arc;
use tokio::sync::Mutex;

pub const TEST_CONFIG: &str = r#"
default_provider = "scripted"
model = "test-model"

[agent]
max_attempts = 2
max_tool_steps = 6
ui_examples = false

[[providers]]
id = "scripted"
type = "ollama"
endpoint = "http://127.0.0.1:11434"
models = ["test-model"]
"#;

pub const FORECAST_REPLY: &str = r#"Here is the current forecast for Boston.
---a2ui_JSON---
[
  {"beginRendering": {"surfaceId": "weather-forecast", "root": "root"}},
  {"surfaceUpdate": {"surfaceId": "weather-forecast", "components": [
    {"id": "root", "component": {"Column": {"children": {"explicitList": ["title", "temp"]}}}},
    {"id": "title", "component": {"Text": {"text": {"literalString": "Boston, MA"}, "usageHint": "h2"}}},
    {"id": "temp", "component": {"Text": {"text": {"path": "/temperature"}}}}
  ]}},
  {"dataModelUpdate": {"surfaceId": "weather-forecast", "contents": [
    {"key": "temperature", "valueString": "59°F"}
  ]}}
]"#;

#[derive(Clone)]
pub struct ScriptedProvider {
    responses: Arc<Mutex<Vec<String>>>,
    recordings: Arc<Mutex<Vec<ModelRequest>>>,
}

impl ScriptedProvider {
    pub fn new(responses: Vec<&str>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(
                responses.into_iter().map(String::from).collect(),
            )),
            recordings: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.recordings.lock().await.clone()
    }

    pub async fn remaining(&self) -> usize {
        self.responses.lock().await.len()
    }

    /// Last user-role message of every request, in order.
    pub async fn prompts(&self) -> Vec<String> {
        self.requests()
            .await
            .iter()
            .filter_map(|request| request.messages.last())
            .map(|message| message.content.clone())
            .collect()
    }
}

#[async_trait]
impl ModelProvider for ScriptedProvider {
    async fn chat(&self, request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let mut responses = self.responses.lock().await;
        self.recordings.lock().await.push(request.clone());
        if responses.is_empty() {
            return Err(ModelError::invalid_response("scripted", "script exhausted"));
        }
        let response = responses.remove(0);
        Ok(ModelResponse::new(response, request.session_id))
    }
}

/// Weather service for Boston that records every call it receives.
#[derive(Clone, Default)]
pub struct RecordingWeather {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingWeather {
    pub async fn calls(&self) -> Vec<String> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl WeatherService for RecordingWeather {
    async fn geocode_location(&self, location: &str) -> Result<GeocodedLocation, WeatherError> {
        self.calls
            .lock()
            .await
            .push(format!("geocode_location({location})"));
        Ok(GeocodedLocation {
            latitude: 42.3554,
            longitude: -71.0605,
            display_name: "Boston, Suffolk County, Massachusetts, United States".into(),
            state_code: Some("MA".into()),
        })
    }

    async fn get_forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast, WeatherError> {
        self.calls
            .lock()
            .await
            .push(format!("get_forecast({latitude}, {longitude})"));
        Ok(Forecast {
            temperature: 15.0,
            temperature_f: 59.0,
            conditions: Conditions::Cloudy,
            wind_speed: 12,
            wind_speed_text: "12 mph".into(),
            location: "Boston, MA".into(),
            periods: Vec::new(),
        })
    }

    async fn get_alerts(&self, state: &str) -> Result<AlertSummary, WeatherError> {
        self.calls.lock().await.push(format!("get_alerts({state})"));
        Ok(AlertSummary::new(vec![WeatherAlert {
            event: "Wind Advisory".into(),
            severity: "Moderate".into(),
            headline: Some("Wind Advisory until 6 PM".into()),
            description: "Gusts up to 45 mph.".into(),
            area: "Suffolk County".into(),
            expires: None,
        }]))
    }
}

pub struct TestAgent {
    pub router: DispatchRouter,
    pub provider: ScriptedProvider,
    pub weather: RecordingWeather,
    pub store: Arc<dyn ConversationStore>,
}

impl TestAgent {
    pub fn new(script: Vec<&str>) -> Self {
        let config = AppConfig::from_toml_str(TEST_CONFIG).expect("test config parses");
        let provider = ScriptedProvider::new(script);
        let weather = RecordingWeather::default();
        let store: Arc<dyn ConversationStore> = Arc::new(MemoryConversationStore::new());
        let toolbox = WeatherToolbox::new(Arc::new(weather.clone()), Arc::clone(&store));
        let roster = AgentRoster::from_config(
            &config,
            Arc::new(provider.clone()),
            toolbox,
            Arc::clone(&store),
        );
        Self {
            router: DispatchRouter::new(roster, Arc::clone(&store)),
            provider,
            weather,
            store,
        }
    }

    /// Runs one turn and returns the terminal update plus everything emitted.
    pub async fn turn(
        &self,
        session_id: &str,
        parts: Vec<Part>,
        ui_active: bool,
    ) -> (Option<TaskUpdate>, Vec<TaskUpdate>) {
        let (events, mut receiver) = TurnEvents::channel();
        let terminal = self
            .router
            .execute(
                InboundTurn {
                    session_id: session_id.to_string(),
                    parts,
                    ui_active,
                },
                &events,
            )
            .await;
        drop(events);
        let mut updates = Vec::new();
        while let Some(update) = receiver.recv().await {
            updates.push(update);
        }
        (terminal, updates)
    }
}

pub fn user_action(value: Value) -> Part {
    Part::Data {
        data: json!({ "userAction": value }),
        metadata: None,
    }
}

pub fn gatherer_script() -> Vec<&'static str> {
    vec![
        r#"{"action":"call_tool","tool":"geocode_location","input":{"location":"Boston"}}"#,
        r#"{"action":"call_tool","tool":"show_weather_confirmation","input":{"location":"Boston","latitude":42.3554,"longitude":-71.0605,"display_name":"Boston, Suffolk County, Massachusetts, United States","state_code":"MA"}}"#,
        "I found Boston. Please choose what you would like to see.",
    ]
}
