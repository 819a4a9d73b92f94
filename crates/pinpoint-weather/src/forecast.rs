//! Daily forecast retrieval from an Open-Meteo style provider.
//!
//! The provider answers in columnar form: a time axis plus one parallel
//! numeric array per requested variable. This module reshapes that into one
//! record per day and refuses partial data outright.

use crate::cache::ForecastCache;
use crate::retry::{with_retry, RetryConfig};
use crate::types::{DailyForecast, WeatherError};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const REQUEST_TIMEOUT_SECS: u64 = 10;
const DAILY_VARIABLES: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum";

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    daily: DailyBlock,
}

/// Columnar daily block: `time` is the axis, the rest are parallel arrays.
#[derive(Debug, Deserialize)]
struct DailyBlock {
    time: Vec<NaiveDate>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    precipitation_sum: Vec<Option<f64>>,
}

/// Client for the external forecast provider, with a read-through response
/// cache and retry on transient failures.
#[derive(Debug)]
pub struct ForecastClient {
    base_url: Url,
    client: Arc<Client>,
    retry: RetryConfig,
    cache: ForecastCache,
}

impl ForecastClient {
    pub fn new(
        base_url: &str,
        retry: RetryConfig,
        cache_ttl: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            base_url: Url::parse(base_url)?,
            client: Arc::new(client),
            retry,
            cache: ForecastCache::new(cache_ttl),
        })
    }

    /// Fetch the daily forecast for a coordinate pair over the provider's
    /// default horizon, ordered by date ascending.
    ///
    /// Coordinates arrive as the strings the geocoder produced; they must
    /// parse as decimal numbers for the provider query.
    pub async fn fetch(
        &self,
        latitude: &str,
        longitude: &str,
    ) -> Result<Vec<DailyForecast>, WeatherError> {
        let lat: f64 = latitude
            .parse()
            .map_err(|_| WeatherError::InvalidCoordinates(format!("latitude: {latitude}")))?;
        let lon: f64 = longitude
            .parse()
            .map_err(|_| WeatherError::InvalidCoordinates(format!("longitude: {longitude}")))?;

        let cache_key = format!("{latitude},{longitude}");
        if let Some(days) = self.cache.get(&cache_key) {
            tracing::debug!(%cache_key, "forecast served from cache");
            return Ok(days);
        }

        let response = with_retry(&self.retry, || {
            self.client
                .get(self.base_url.clone())
                .query(&[
                    ("latitude", lat.to_string()),
                    ("longitude", lon.to_string()),
                    ("daily", DAILY_VARIABLES.to_string()),
                ])
                .send()
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "forecast provider returned non-success status");
            return Err(WeatherError::UpstreamStatus(status.as_u16()));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::Parse(e.to_string()))?;

        let days = reshape_daily(body.daily)?;
        tracing::debug!(days = days.len(), "forecast fetched");

        self.cache.insert(cache_key, days.clone());
        Ok(days)
    }
}

/// Turn the columnar daily block into one record per day.
///
/// Any axis/array length mismatch or missing value fails the whole response;
/// partial daily data is never returned.
fn reshape_daily(block: DailyBlock) -> Result<Vec<DailyForecast>, WeatherError> {
    let len = block.time.len();
    if block.temperature_2m_max.len() != len
        || block.temperature_2m_min.len() != len
        || block.precipitation_sum.len() != len
    {
        return Err(WeatherError::Parse(format!(
            "daily arrays do not match time axis length {len}"
        )));
    }

    let mut days = Vec::with_capacity(len);
    for (i, date) in block.time.into_iter().enumerate() {
        match (
            block.temperature_2m_max[i],
            block.temperature_2m_min[i],
            block.precipitation_sum[i],
        ) {
            (Some(max), Some(min), Some(precip)) => days.push(DailyForecast {
                date,
                temperature_2m_max: max,
                temperature_2m_min: min,
                precipitation_sum: precip,
            }),
            _ => {
                return Err(WeatherError::Parse(format!("missing daily value for {date}")));
            }
        }
    }

    Ok(days)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_reshape_produces_one_record_per_day() {
        let block = DailyBlock {
            time: vec![date("2026-08-29"), date("2026-08-30")],
            temperature_2m_max: vec![Some(21.3), Some(19.8)],
            temperature_2m_min: vec![Some(12.8), Some(11.2)],
            precipitation_sum: vec![Some(0.0), Some(4.6)],
        };

        let days = reshape_daily(block).unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date("2026-08-29"));
        assert_eq!(days[0].temperature_2m_max, 21.3);
        assert_eq!(days[1].precipitation_sum, 4.6);
        assert!(days[0].date < days[1].date);
    }

    #[test]
    fn test_reshape_rejects_length_mismatch() {
        let block = DailyBlock {
            time: vec![date("2026-08-29"), date("2026-08-30")],
            temperature_2m_max: vec![Some(21.3)],
            temperature_2m_min: vec![Some(12.8), Some(11.2)],
            precipitation_sum: vec![Some(0.0), Some(4.6)],
        };

        assert!(matches!(reshape_daily(block), Err(WeatherError::Parse(_))));
    }

    #[test]
    fn test_reshape_rejects_missing_values() {
        let block = DailyBlock {
            time: vec![date("2026-08-29")],
            temperature_2m_max: vec![Some(21.3)],
            temperature_2m_min: vec![None],
            precipitation_sum: vec![Some(0.0)],
        };

        assert!(matches!(reshape_daily(block), Err(WeatherError::Parse(_))));
    }

    #[test]
    fn test_reshape_empty_block_is_ok_and_empty() {
        let block = DailyBlock {
            time: vec![],
            temperature_2m_max: vec![],
            temperature_2m_min: vec![],
            precipitation_sum: vec![],
        };

        assert!(reshape_daily(block).unwrap().is_empty());
    }
}
