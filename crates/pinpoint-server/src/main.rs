use anyhow::{Context, Result};
use pinpoint_core::Config;
use pinpoint_server::{api, AppContext, LocationResolver};
use pinpoint_store::LocationStore;
use pinpoint_weather::retry::DEFAULT_MAX_DELAY_MS;
use pinpoint_weather::{ForecastClient, GeocodeClient, RetryConfig};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use warp::Filter;

#[tokio::main]
async fn main() -> Result<()> {
    pinpoint_core::init()?;

    let (config, _validation) = Config::load_validated()?;

    let db_path = PathBuf::from(&config.store.database_path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create data directory")?;
    }
    let store = Arc::new(LocationStore::open(&db_path)?);

    let geocoder = GeocodeClient::new(
        &config.geocoding.base_url,
        &config.geocoding.user_agent,
        RetryConfig::new(
            config.geocoding.max_retries,
            config.geocoding.initial_backoff_ms,
            DEFAULT_MAX_DELAY_MS,
        ),
    )?;

    let forecast = ForecastClient::new(
        &config.forecast.base_url,
        RetryConfig::new(
            config.forecast.max_retries,
            config.forecast.initial_backoff_ms,
            DEFAULT_MAX_DELAY_MS,
        ),
        Duration::from_secs(config.forecast.cache_ttl_secs),
    )?;

    let ctx = AppContext {
        resolver: Arc::new(LocationResolver::new(store, geocoder)),
        forecast: Arc::new(forecast),
    };

    let ip: IpAddr = config
        .server
        .bind_address
        .parse()
        .context("Invalid bind address")?;
    let addr = SocketAddr::new(ip, config.server.port);

    tracing::info!(%addr, "pinpoint listening");
    warp::serve(api(ctx).with(warp::log("pinpoint"))).run(addr).await;

    Ok(())
}
