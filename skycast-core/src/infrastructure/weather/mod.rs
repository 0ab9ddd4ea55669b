//! Location and weather retrieval used by the agents' tools.

mod error;
mod http;
mod parse;
mod service;
mod types;

pub use error::WeatherError;
pub use http::HttpWeatherService;
pub use parse::{classify_conditions, extract_state_code, parse_wind_speed};
pub use service::WeatherService;
pub use types::{AlertSummary, Conditions, Forecast, ForecastPeriod, GeocodedLocation, WeatherAlert};
