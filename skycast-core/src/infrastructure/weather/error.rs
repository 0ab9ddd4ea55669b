use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("network error calling {service}: {source}")]
    Network {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("no match found for '{query}'")]
    NotFound { query: String },
    #[error("{service} returned an invalid response: {reason}")]
    InvalidResponse {
        service: &'static str,
        reason: String,
    },
    #[error("{service} answered with HTTP {status}")]
    Status { service: &'static str, status: u16 },
}

impl WeatherError {
    pub fn invalid(service: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            service,
            reason: reason.into(),
        }
    }
}
