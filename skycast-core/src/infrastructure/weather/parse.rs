//! Pure helpers for turning upstream weather text into typed values.

use super::types::{Conditions, Forecast, ForecastPeriod, WeatherAlert};

/// Forecast periods kept in a summary.
pub const SUMMARY_PERIODS: usize = 6;

/// Finds a two-letter state code in a display name such as "Austin, TX, USA".
///
/// The code must follow a comma and be followed by another comma or the end.
pub fn extract_state_code(display_name: &str) -> Option<String> {
    display_name
        .split(',')
        .skip(1)
        .map(str::trim)
        .find(|segment| segment.len() == 2 && segment.chars().all(|c| c.is_ascii_uppercase()))
        .map(str::to_string)
}

pub fn classify_conditions(short_forecast: &str) -> Conditions {
    let text = short_forecast.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|word| text.contains(word));
    if has(&["thunder", "storm", "hurricane", "tornado"]) {
        Conditions::Storm
    } else if has(&["snow", "sleet", "flurr", "blizzard", "freezing"]) {
        Conditions::Snow
    } else if has(&["rain", "shower", "drizzle"]) {
        Conditions::Rain
    } else if has(&["cloud", "overcast", "fog", "haze"]) {
        Conditions::Cloudy
    } else {
        Conditions::Clear
    }
}

/// First integer in text like "5 to 10 mph". Zero when there is none.
pub fn parse_wind_speed(text: &str) -> u32 {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|chunk| !chunk.is_empty())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Returns `(celsius, fahrenheit)`.
pub fn both_scales(temperature: f64, unit: &str) -> (f64, f64) {
    if unit.eq_ignore_ascii_case("C") {
        (round1(temperature), round1(temperature * 9.0 / 5.0 + 32.0))
    } else {
        (round1((temperature - 32.0) * 5.0 / 9.0), round1(temperature))
    }
}

/// Builds a summary from NWS periods. `None` when there are no periods.
pub fn summarise_forecast(location: &str, periods: Vec<ForecastPeriod>) -> Option<Forecast> {
    let current = periods.first()?.clone();
    let (celsius, fahrenheit) = both_scales(current.temperature, &current.temperature_unit);
    Some(Forecast {
        temperature: celsius,
        temperature_f: fahrenheit,
        conditions: classify_conditions(&current.short_forecast),
        wind_speed: parse_wind_speed(&current.wind_speed),
        wind_speed_text: current.wind_speed.clone(),
        location: location.to_string(),
        periods: periods.into_iter().take(SUMMARY_PERIODS).collect(),
    })
}

fn severity_rank(severity: &str) -> u8 {
    match severity.to_ascii_lowercase().as_str() {
        "extreme" => 0,
        "severe" => 1,
        "moderate" => 2,
        "minor" => 3,
        _ => 4,
    }
}

/// Most severe first; equal severities keep upstream order.
pub fn order_by_severity(alerts: &mut [WeatherAlert]) {
    alerts.sort_by_key(|alert| severity_rank(&alert.severity));
}
