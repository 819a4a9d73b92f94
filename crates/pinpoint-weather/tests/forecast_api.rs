//! Wiremock-backed tests for the forecast client.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use pinpoint_weather::{ForecastClient, RetryConfig, WeatherError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn no_retry() -> RetryConfig {
    RetryConfig::new(0, 1, 1)
}

fn client_for(server: &MockServer, retry: RetryConfig, ttl_secs: u64) -> ForecastClient {
    ForecastClient::new(
        &format!("{}/v1/forecast", server.uri()),
        retry,
        Duration::from_secs(ttl_secs),
    )
    .unwrap()
}

fn daily_body() -> serde_json::Value {
    serde_json::json!({
        "latitude": 59.91,
        "longitude": 10.75,
        "daily": {
            "time": ["2026-08-29", "2026-08-30", "2026-08-31"],
            "temperature_2m_max": [21.3, 19.8, 17.5],
            "temperature_2m_min": [12.8, 11.2, 9.9],
            "precipitation_sum": [0.0, 4.6, 1.2]
        }
    })
}

#[tokio::test]
async fn test_fetch_reshapes_columnar_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "59.9139"))
        .and(query_param("longitude", "10.7522"))
        .and(query_param(
            "daily",
            "temperature_2m_max,temperature_2m_min,precipitation_sum",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, no_retry(), 3600);
    let days = client.fetch("59.9139", "10.7522").await.unwrap();

    assert_eq!(days.len(), 3);
    assert_eq!(days[0].date.to_string(), "2026-08-29");
    assert_eq!(days[0].temperature_2m_max, 21.3);
    assert_eq!(days[2].precipitation_sum, 1.2);
    assert!(days.windows(2).all(|w| w[0].date < w[1].date));
}

#[tokio::test]
async fn test_identical_requests_served_from_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, no_retry(), 3600);
    let first = client.fetch("59.9139", "10.7522").await.unwrap();
    let second = client.fetch("59.9139", "10.7522").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_zero_ttl_disables_response_cache() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, no_retry(), 0);
    client.fetch("59.9139", "10.7522").await.unwrap();
    client.fetch("59.9139", "10.7522").await.unwrap();
}

#[tokio::test]
async fn test_unparseable_coordinates_never_hit_network() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 and the test would still pass,
    // so assert on the recorded request count instead.

    let client = client_for(&server, no_retry(), 3600);
    let err = client.fetch("not-a-number", "10.7522").await.unwrap_err();

    assert!(matches!(err, WeatherError::InvalidCoordinates(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_length_mismatch_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": {
                "time": ["2026-08-29", "2026-08-30"],
                "temperature_2m_max": [21.3],
                "temperature_2m_min": [12.8, 11.2],
                "precipitation_sum": [0.0, 4.6]
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, no_retry(), 3600);
    let err = client.fetch("59.9139", "10.7522").await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn test_retry_exhaustion_surfaces_upstream_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    let client = client_for(&server, RetryConfig::new(1, 1, 5), 3600);
    let err = client.fetch("59.9139", "10.7522").await.unwrap_err();
    assert!(matches!(err, WeatherError::UpstreamStatus(500)));

    // A failed fetch must not poison the cache.
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(daily_body()))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(client.fetch("59.9139", "10.7522").await.unwrap().len(), 3);
}
