//! Forward geocoding: convert a location name query to coordinates.
//! Speaks the Nominatim (OpenStreetMap) search API.

use crate::retry::{with_retry, RetryConfig};
use crate::types::{Coordinates, WeatherError};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_GEOCODING_URL: &str = "https://nominatim.openstreetmap.org/search";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    lat: String,
    lon: String,
}

/// Client for the external geocoding provider.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    base_url: Url,
    client: Arc<Client>,
    retry: RetryConfig,
}

impl GeocodeClient {
    /// Create a client against a geocoding endpoint.
    ///
    /// The user agent is required; the provider rejects anonymous traffic.
    pub fn new(base_url: &str, user_agent: &str, retry: RetryConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            base_url: Url::parse(base_url)?,
            client: Arc::new(client),
            retry,
        })
    }

    /// Look up coordinates for a canonical location name.
    ///
    /// The query is form-encoded: spaces become the `+` word separators the
    /// provider expects, anything else unsafe is percent-escaped.
    ///
    /// `Ok(Some)` carries the first result's lat/lon exactly as the provider
    /// printed them. `Ok(None)` means the provider had no results. `Err`
    /// covers non-success statuses, transport failures, and malformed bodies.
    pub async fn lookup(&self, query: &str) -> Result<Option<Coordinates>, WeatherError> {
        tracing::debug!(%query, "geocoding request");

        let response = with_retry(&self.retry, || {
            self.client
                .get(self.base_url.clone())
                .query(&[("q", query), ("format", "json")])
                .send()
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "geocoding provider returned non-success status");
            return Err(WeatherError::UpstreamStatus(status.as_u16()));
        }

        let results: Vec<GeocodeResult> = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        match results.into_iter().next() {
            Some(first) => Ok(Some(Coordinates {
                latitude: first.lat,
                longitude: first.lon,
            })),
            None => {
                tracing::debug!(%query, "geocoding returned no results");
                Ok(None)
            }
        }
    }
}
