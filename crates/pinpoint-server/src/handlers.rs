//! Request handlers for the two lookup endpoints.
//!
//! Every failure path resolves to a well-formed JSON error body; upstream
//! transport failures surface as 404, never as 500.

use pinpoint_core::ApiError;
use pinpoint_store::StoredLocation;
use pinpoint_weather::DailyForecast;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use warp::http::StatusCode;
use warp::Reply;

use crate::routes::AppContext;

pub const ERR_LOCATION_REQUIRED: &str = "Location parameter is required.";
pub const ERR_COORDINATES: &str = "Failed to fetch and save location coordinates.";
pub const ERR_WEATHER: &str = "Failed to fetch weather data.";

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    location: Option<String>,
}

impl LocationQuery {
    /// The location parameter, if present and non-blank.
    fn location(&self) -> Option<&str> {
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct CoordinatesBody {
    location: String,
    latitude: String,
    longitude: String,
}

#[derive(Debug, Serialize)]
struct WeatherBody {
    location: String,
    latitude: String,
    longitude: String,
    weather: Vec<DailyForecast>,
}

fn coordinates_body(location: StoredLocation) -> CoordinatesBody {
    CoordinatesBody {
        location: location.name,
        latitude: location.latitude,
        longitude: location.longitude,
    }
}

fn error_reply(err: &ApiError) -> warp::reply::Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warp::reply::with_status(
        warp::reply::json(&ErrorBody {
            error: err.to_string(),
        }),
        status,
    )
    .into_response()
}

fn not_found(message: &str) -> warp::reply::Response {
    error_reply(&ApiError::NotFound(message.to_string()))
}

/// POST /api/get-location-coordinates
///
/// Resolves a location name to coordinates without weather data.
pub async fn get_location_coordinates(
    query: LocationQuery,
    ctx: AppContext,
) -> Result<warp::reply::Response, Infallible> {
    tracing::info!("received request for location coordinates");

    let Some(raw) = query.location() else {
        tracing::warn!("no location parameter provided");
        return Ok(error_reply(&ApiError::Validation(ERR_LOCATION_REQUIRED.to_string())));
    };

    match ctx.resolver.resolve(raw).await {
        Ok(Some(location)) => Ok(warp::reply::json(&coordinates_body(location)).into_response()),
        Ok(None) => Ok(not_found(ERR_COORDINATES)),
        Err(e) => {
            tracing::error!(error = %e, "store failure during resolution");
            Ok(not_found(ERR_COORDINATES))
        }
    }
}

/// POST /api/get-weather
///
/// Resolves a location name to coordinates and attaches the daily forecast.
/// The forecast is only attempted after a successful resolution.
pub async fn get_location_weather(
    query: LocationQuery,
    ctx: AppContext,
) -> Result<warp::reply::Response, Infallible> {
    tracing::info!("received request for location weather");

    let Some(raw) = query.location() else {
        tracing::warn!("no location parameter provided");
        return Ok(error_reply(&ApiError::Validation(ERR_LOCATION_REQUIRED.to_string())));
    };

    let location = match ctx.resolver.resolve(raw).await {
        Ok(Some(location)) => location,
        Ok(None) => return Ok(not_found(ERR_COORDINATES)),
        Err(e) => {
            tracing::error!(error = %e, "store failure during resolution");
            return Ok(not_found(ERR_COORDINATES));
        }
    };

    match ctx.forecast.fetch(&location.latitude, &location.longitude).await {
        Ok(weather) if !weather.is_empty() => {
            tracing::info!(location = %location.name, days = weather.len(), "weather fetched");
            Ok(warp::reply::json(&WeatherBody {
                location: location.name,
                latitude: location.latitude,
                longitude: location.longitude,
                weather,
            })
            .into_response())
        }
        Ok(_) => {
            tracing::warn!(location = %location.name, "forecast provider returned no days");
            Ok(not_found(ERR_WEATHER))
        }
        Err(e) => {
            tracing::warn!(location = %location.name, error = %e, "forecast fetch failed");
            Ok(not_found(ERR_WEATHER))
        }
    }
}
