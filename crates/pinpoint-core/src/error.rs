//! Error taxonomy for the HTTP surface and the startup path.
//!
//! Request-level failures always map to a well-formed JSON error response;
//! the lookup flow never surfaces a 500 to callers. Upstream transport
//! failures are collapsed into `NotFound` at the handler boundary.

use thiserror::Error;

/// Request-level errors surfaced by the HTTP API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required request parameter is missing or blank.
    #[error("{0}")]
    Validation(String),

    /// No data obtainable from the store or any upstream source.
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::NotFound(_) => 404,
        }
    }
}

/// Configuration errors. These only occur at startup; they are never
/// produced by the request path.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
