use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Coordinates as returned by the geocoding provider.
///
/// Kept as strings so the provider's textual precision survives storage and
/// serialization without floating-point reformatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

/// One day of forecast data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature_2m_max: f64,
    pub temperature_2m_min: f64,
    pub precipitation_sum: f64,
}

/// Errors surfaced by the provider clients.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),
}
