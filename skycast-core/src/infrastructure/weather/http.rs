use super::error::WeatherError;
use super::parse::{extract_state_code, order_by_severity, summarise_forecast};
use super::service::WeatherService;
use super::types::{AlertSummary, Forecast, ForecastPeriod, GeocodedLocation, WeatherAlert};
use crate::config::WeatherSettings;
use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

const GEOCODER: &str = "geocoder";
const NWS: &str = "weather.gov";

/// Nominatim for geocoding, the National Weather Service for forecasts and alerts.
#[derive(Clone)]
pub struct HttpWeatherService {
    http: Client,
    geocode_endpoint: String,
    forecast_endpoint: String,
}

impl HttpWeatherService {
    pub fn from_settings(settings: &WeatherSettings) -> Result<Self, WeatherError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/geo+json, application/json"),
        );
        let http = Client::builder()
            .user_agent(settings.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|source| WeatherError::Network {
                service: GEOCODER,
                source,
            })?;
        Ok(Self {
            http,
            geocode_endpoint: settings.geocode_endpoint.trim_end_matches('/').to_string(),
            forecast_endpoint: settings.forecast_endpoint.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        debug!(service, url, "Requesting weather data");
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| WeatherError::Network { service, source })?;
        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status {
                service,
                status: status.as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|err| WeatherError::invalid(service, err.to_string()))
    }
}

#[async_trait]
impl WeatherService for HttpWeatherService {
    async fn geocode_location(&self, location: &str) -> Result<GeocodedLocation, WeatherError> {
        let url = format!("{}/search", self.geocode_endpoint);
        let places: Vec<NominatimPlace> = self
            .get_json(
                GEOCODER,
                &url,
                &[
                    ("q", location),
                    ("format", "json"),
                    ("limit", "1"),
                    ("addressdetails", "1"),
                ],
            )
            .await?;
        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound {
                query: location.to_string(),
            })?;

        let latitude = parse_coordinate(&place.lat)?;
        let longitude = parse_coordinate(&place.lon)?;
        let state_code = place
            .address
            .and_then(|address| address.iso_state)
            .and_then(|iso| iso.strip_prefix("US-").map(str::to_string))
            .or_else(|| extract_state_code(&place.display_name));

        info!(location, latitude, longitude, state = ?state_code, "Geocoded location");
        Ok(GeocodedLocation {
            latitude,
            longitude,
            display_name: place.display_name,
            state_code,
        })
    }

    async fn get_forecast(&self, latitude: f64, longitude: f64) -> Result<Forecast, WeatherError> {
        let points_url = format!("{}/points/{latitude:.4},{longitude:.4}", self.forecast_endpoint);
        let points: PointsResponse = self.get_json(NWS, &points_url, &[]).await?;
        let forecast_url = points
            .properties
            .forecast
            .ok_or_else(|| WeatherError::invalid(NWS, "points response has no forecast link"))?;
        let location = points
            .properties
            .relative_location
            .map(|relative| relative.properties.label())
            .unwrap_or_else(|| format!("{latitude:.4}, {longitude:.4}"));

        let forecast: ForecastResponse = self.get_json(NWS, &forecast_url, &[]).await?;
        summarise_forecast(&location, forecast.properties.periods)
            .ok_or_else(|| WeatherError::invalid(NWS, "forecast has no periods"))
    }

    async fn get_alerts(&self, state: &str) -> Result<AlertSummary, WeatherError> {
        let state = state.trim().to_ascii_uppercase();
        let url = format!("{}/alerts/active", self.forecast_endpoint);
        let response: AlertsResponse = self.get_json(NWS, &url, &[("area", state.as_str())]).await?;
        let mut alerts: Vec<WeatherAlert> = response
            .features
            .into_iter()
            .map(|feature| feature.properties.into())
            .collect();
        order_by_severity(&mut alerts);
        info!(state = state.as_str(), count = alerts.len(), "Fetched active alerts");
        Ok(AlertSummary::new(alerts))
    }
}

fn parse_coordinate(raw: &str) -> Result<f64, WeatherError> {
    raw.parse()
        .map_err(|_| WeatherError::invalid(GEOCODER, format!("bad coordinate '{raw}'")))
}

#[derive(Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Deserialize)]
struct NominatimAddress {
    #[serde(rename = "ISO3166-2-lvl4", default)]
    iso_state: Option<String>,
}

#[derive(Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsProperties {
    forecast: Option<String>,
    #[serde(default)]
    relative_location: Option<RelativeLocation>,
}

#[derive(Deserialize)]
struct RelativeLocation {
    properties: RelativeLocationProperties,
}

#[derive(Deserialize)]
struct RelativeLocationProperties {
    city: String,
    state: String,
}

impl RelativeLocationProperties {
    fn label(self) -> String {
        format!("{}, {}", self.city, self.state)
    }
}

#[derive(Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Deserialize)]
struct ForecastProperties {
    #[serde(default)]
    periods: Vec<ForecastPeriod>,
}

#[derive(Deserialize)]
struct AlertsResponse {
    #[serde(default)]
    features: Vec<AlertFeature>,
}

#[derive(Deserialize)]
struct AlertFeature {
    properties: AlertProperties,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AlertProperties {
    event: String,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    headline: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    area_desc: Option<String>,
    #[serde(default)]
    expires: Option<String>,
}

impl From<AlertProperties> for WeatherAlert {
    fn from(props: AlertProperties) -> Self {
        Self {
            event: props.event,
            severity: props.severity.unwrap_or_default(),
            headline: props.headline,
            description: props.description.unwrap_or_default(),
            area: props.area_desc.unwrap_or_default(),
            expires: props.expires,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominatim_place_reads_iso_state() {
        let raw = r#"[{"lat":"42.3554","lon":"-71.0605","display_name":"Boston, Suffolk County, Massachusetts, United States","address":{"city":"Boston","ISO3166-2-lvl4":"US-MA"}}]"#;
        let places: Vec<NominatimPlace> = serde_json::from_str(raw).unwrap();
        let iso = places[0].address.as_ref().and_then(|a| a.iso_state.clone());
        assert_eq!(iso.as_deref(), Some("US-MA"));
        assert_eq!(parse_coordinate(&places[0].lat).unwrap(), 42.3554);
    }

    #[test]
    fn alert_properties_fill_missing_fields() {
        let raw = r#"{"features":[{"properties":{"event":"Flood Watch","severity":"Moderate","areaDesc":"Suffolk"}}]}"#;
        let response: AlertsResponse = serde_json::from_str(raw).unwrap();
        let alert: WeatherAlert = response.features.into_iter().next().unwrap().properties.into();
        assert_eq!(alert.event, "Flood Watch");
        assert_eq!(alert.area, "Suffolk");
        assert_eq!(alert.description, "");
    }

    #[test]
    fn forecast_periods_deserialize_from_nws_shape() {
        let raw = r#"{"properties":{"periods":[{"number":1,"name":"Tonight","temperature":48,"temperatureUnit":"F","windSpeed":"5 to 10 mph","windDirection":"SW","shortForecast":"Mostly Clear","detailedForecast":"Mostly clear.","isDaytime":false}]}}"#;
        let response: ForecastResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.properties.periods[0].temperature, 48.0);
        assert!(!response.properties.periods[0].is_daytime);
    }
}
