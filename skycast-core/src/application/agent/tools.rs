//! Weather tools the agents may call, and the toolbox that runs them.

use super::errors::ToolError;
use crate::weather::{WeatherService, extract_state_code};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use skycast_session::{ConfirmationRequest, ConversationStore, modify};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherTool {
    GeocodeLocation,
    GetForecast,
    GetAlerts,
    ShowWeatherConfirmation,
}

/// Tools of the agent that resolves a location and asks for confirmation.
pub const GATHERER_TOOLS: &[WeatherTool] =
    &[WeatherTool::GeocodeLocation, WeatherTool::ShowWeatherConfirmation];

/// Tools of the agents that fetch and present weather data.
pub const FETCHER_TOOLS: &[WeatherTool] = &[
    WeatherTool::GeocodeLocation,
    WeatherTool::GetForecast,
    WeatherTool::GetAlerts,
];

impl WeatherTool {
    pub const ALL: [WeatherTool; 4] = [
        WeatherTool::GeocodeLocation,
        WeatherTool::GetForecast,
        WeatherTool::GetAlerts,
        WeatherTool::ShowWeatherConfirmation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WeatherTool::GeocodeLocation => "geocode_location",
            WeatherTool::GetForecast => "get_forecast",
            WeatherTool::GetAlerts => "get_alerts",
            WeatherTool::ShowWeatherConfirmation => "show_weather_confirmation",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name.trim())
    }

    /// One-line description with the expected input, for system instructions.
    pub fn describe(self) -> &'static str {
        match self {
            WeatherTool::GeocodeLocation => {
                "geocode_location {\"location\": string} - converts a place name to latitude, longitude, display_name and state_code"
            }
            WeatherTool::GetForecast => {
                "get_forecast {\"latitude\": number, \"longitude\": number} - current conditions (temperature in Celsius and Fahrenheit, conditions, wind) and upcoming forecast periods"
            }
            WeatherTool::GetAlerts => {
                "get_alerts {\"state\": string} - active weather alerts for a two-letter US state code, most severe first"
            }
            WeatherTool::ShowWeatherConfirmation => {
                "show_weather_confirmation {\"location\": string, \"latitude\": number, \"longitude\": number, \"display_name\": string, \"state_code\": string} - shows the user a confirmation form for the geocoded location"
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToolExecution {
    pub tool: String,
    pub input: Value,
    pub success: bool,
    pub output: Value,
    pub message: Option<String>,
}

impl ToolExecution {
    /// The next prompt handed back to the model.
    pub fn to_prompt(&self) -> String {
        json!({
            "tool_result": {
                "tool": self.tool,
                "input": self.input,
                "success": self.success,
                "output": self.output,
                "message": self.message,
            },
            "instruction": "Continue. Call another tool or answer with your final response.",
        })
        .to_string()
    }
}

#[derive(Deserialize)]
struct GeocodeInput {
    location: String,
}

#[derive(Deserialize)]
struct ForecastInput {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct AlertsInput {
    #[serde(alias = "state_code")]
    state: String,
}

#[derive(Deserialize)]
struct ConfirmationInput {
    location: String,
    latitude: f64,
    longitude: f64,
    display_name: String,
    #[serde(default)]
    state_code: Option<String>,
}

impl From<ConfirmationInput> for ConfirmationRequest {
    fn from(input: ConfirmationInput) -> Self {
        let state_code = input
            .state_code
            .map(|code| code.trim().to_ascii_uppercase())
            .filter(|code| !code.is_empty())
            .or_else(|| extract_state_code(&input.display_name));
        Self {
            location: input.location,
            latitude: input.latitude,
            longitude: input.longitude,
            display_name: input.display_name,
            state_code,
        }
    }
}

/// Runs tool calls against the weather service and the conversation store.
#[derive(Clone)]
pub struct WeatherToolbox {
    weather: Arc<dyn WeatherService>,
    store: Arc<dyn ConversationStore>,
}

impl WeatherToolbox {
    pub fn new(weather: Arc<dyn WeatherService>, store: Arc<dyn ConversationStore>) -> Self {
        Self { weather, store }
    }

    pub async fn execute(
        &self,
        agent: &str,
        allowed: &[WeatherTool],
        session_id: &str,
        name: &str,
        input: Value,
    ) -> Result<Value, ToolError> {
        let tool = WeatherTool::from_name(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        if !allowed.contains(&tool) {
            return Err(ToolError::NotPermitted {
                tool: tool.name().to_string(),
                agent: agent.to_string(),
            });
        }
        info!(agent, tool = tool.name(), session_id, "Executing tool");

        match tool {
            WeatherTool::GeocodeLocation => {
                let GeocodeInput { location } = decode(tool, input)?;
                let place = self
                    .weather
                    .geocode_location(&location)
                    .await
                    .map_err(|source| execution(tool, source))?;
                Ok(to_output(&place))
            }
            WeatherTool::GetForecast => {
                let ForecastInput {
                    latitude,
                    longitude,
                } = decode(tool, input)?;
                let forecast = self
                    .weather
                    .get_forecast(latitude, longitude)
                    .await
                    .map_err(|source| execution(tool, source))?;
                Ok(to_output(&forecast))
            }
            WeatherTool::GetAlerts => {
                let AlertsInput { state } = decode(tool, input)?;
                let alerts = self
                    .weather
                    .get_alerts(&state)
                    .await
                    .map_err(|source| execution(tool, source))?;
                Ok(to_output(&alerts))
            }
            WeatherTool::ShowWeatherConfirmation => {
                let request: ConfirmationRequest =
                    decode::<ConfirmationInput>(tool, input)?.into();
                self.request_confirmation(session_id, request).await
            }
        }
    }

    async fn request_confirmation(
        &self,
        session_id: &str,
        request: ConfirmationRequest,
    ) -> Result<Value, ToolError> {
        let output = json!({
            "status": "confirmation_requested",
            "location": request.location,
            "display_name": request.display_name,
            "latitude": request.latitude,
            "longitude": request.longitude,
            "state_code": request.state_code,
            "note": "The confirmation form will be shown to the user. Stop calling tools and reply with one short sentence.",
        });

        let displaced = modify(self.store.as_ref(), session_id, |state| {
            state.set_pending(request)
        })
        .await
        .map_err(|source| ToolError::State {
            tool: WeatherTool::ShowWeatherConfirmation.name().to_string(),
            source,
        })?;

        if let Some(previous) = displaced {
            warn!(
                session_id,
                displaced = previous.display_name.as_str(),
                "Replaced a pending confirmation that was never answered"
            );
        }
        info!(session_id, "Stored pending weather confirmation");
        Ok(output)
    }
}

fn decode<T: DeserializeOwned>(tool: WeatherTool, input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|err| ToolError::InvalidInput {
        tool: tool.name().to_string(),
        reason: err.to_string(),
    })
}

fn execution(tool: WeatherTool, source: crate::weather::WeatherError) -> ToolError {
    ToolError::Execution {
        tool: tool.name().to_string(),
        source,
    }
}

fn to_output<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}
