use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conditions {
    Clear,
    Cloudy,
    Rain,
    Snow,
    Storm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: String,
    pub temperature: f64,
    pub temperature_unit: String,
    pub wind_speed: String,
    #[serde(default)]
    pub wind_direction: String,
    pub short_forecast: String,
    #[serde(default)]
    pub detailed_forecast: String,
    #[serde(default)]
    pub is_daytime: bool,
}

/// Current conditions plus the next few forecast periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    /// Celsius.
    pub temperature: f64,
    pub temperature_f: f64,
    pub conditions: Conditions,
    #[serde(rename = "windSpeed")]
    pub wind_speed: u32,
    #[serde(rename = "windSpeedText")]
    pub wind_speed_text: String,
    pub location: String,
    pub periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub event: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub expires: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub alerts: Vec<WeatherAlert>,
    pub count: usize,
}

impl AlertSummary {
    pub fn new(alerts: Vec<WeatherAlert>) -> Self {
        Self {
            count: alerts.len(),
            alerts,
        }
    }
}
