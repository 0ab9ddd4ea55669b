use super::error::WeatherError;
use super::types::{AlertSummary, Forecast, GeocodedLocation};
use async_trait::async_trait;

#[async_trait]
pub trait WeatherService: Send + Sync {
    async fn geocode_location(&self, location: &str) -> Result<GeocodedLocation, WeatherError>;

    async fn get_forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast, WeatherError>;

    /// Active alerts for a two-letter US state code.
    async fn get_alerts(&self, state: &str) -> Result<AlertSummary, WeatherError>;
}
