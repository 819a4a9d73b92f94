//! Route registration for the lookup API.

use crate::handlers::{self, LocationQuery};
use crate::resolver::LocationResolver;
use pinpoint_weather::ForecastClient;
use std::sync::Arc;
use warp::Filter;

/// Shared per-process dependencies, constructed once at startup and injected
/// into every handler.
#[derive(Clone)]
pub struct AppContext {
    pub resolver: Arc<LocationResolver>,
    pub forecast: Arc<ForecastClient>,
}

/// The two lookup endpoints.
///
/// Both take the location as a query parameter on a POST request; the verb
/// is part of the existing external contract. No CSRF layer: the API is for
/// server-to-server use, not browser form submission.
pub fn api(
    ctx: AppContext,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_ctx = warp::any().map(move || ctx.clone());

    let weather = warp::post()
        .and(warp::path!("api" / "get-weather"))
        .and(warp::query::<LocationQuery>())
        .and(with_ctx.clone())
        .and_then(handlers::get_location_weather);

    let coordinates = warp::post()
        .and(warp::path!("api" / "get-location-coordinates"))
        .and(warp::query::<LocationQuery>())
        .and(with_ctx)
        .and_then(handlers::get_location_coordinates);

    weather.or(coordinates)
}
