//! HTTP surface and cache-or-fetch orchestration for Pinpoint.

pub mod handlers;
pub mod resolver;
pub mod routes;

pub use resolver::LocationResolver;
pub use routes::{api, AppContext};
