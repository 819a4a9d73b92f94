//! Clients for the external geocoding and forecast providers.
//!
//! Both clients are constructed once at startup with an injectable base URL
//! and a shared retry policy, and report failures as explicit result values
//! rather than panicking or hiding them in logs.

pub mod cache;
pub mod forecast;
pub mod geocode;
pub mod retry;
pub mod types;

pub use cache::ForecastCache;
pub use forecast::ForecastClient;
pub use geocode::GeocodeClient;
pub use retry::RetryConfig;
pub use types::{Coordinates, DailyForecast, WeatherError};
