//! Shared configuration, error taxonomy, and logging setup for Pinpoint.

pub mod config;
pub mod error;

pub use config::{Config, ForecastConfig, GeocodingConfig, ServerConfig, StoreConfig, ValidationResult};
pub use error::{ApiError, ConfigError};

use anyhow::Result;

/// Initialize tracing/logging for the service.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Pinpoint core initialized");
    Ok(())
}
