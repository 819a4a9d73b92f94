//! Cache-or-fetch coordinate resolution.
//!
//! Known names are answered from the store without touching the network.
//! Unknown names go to the geocoding provider and, on success, the answer is
//! written back so every later request for the same name is a cache hit.

use anyhow::Result;
use pinpoint_store::{LocationStore, StoredLocation};
use pinpoint_weather::GeocodeClient;
use std::sync::Arc;

/// Canonical form of a location name: trimmed and upper-cased, so lookups
/// are insensitive to casing and surrounding whitespace.
pub fn canonical_name(raw: &str) -> String {
    raw.trim().to_uppercase()
}

pub struct LocationResolver {
    store: Arc<LocationStore>,
    geocoder: GeocodeClient,
}

impl LocationResolver {
    pub fn new(store: Arc<LocationStore>, geocoder: GeocodeClient) -> Self {
        Self { store, geocoder }
    }

    /// Resolve a location name to coordinates.
    ///
    /// `Ok(None)` means neither the store nor the provider could answer;
    /// provider failures degrade to `Ok(None)` so an upstream outage reads
    /// as not-found rather than an internal error, and nothing is written.
    /// `Err` is reserved for the store itself failing.
    pub async fn resolve(&self, raw_name: &str) -> Result<Option<StoredLocation>> {
        let name = canonical_name(raw_name);

        if let Some(location) = self.store.get(&name)? {
            tracing::info!(%name, "location found in store");
            return Ok(Some(location));
        }
        tracing::info!(%name, "location not in store, querying geocoding provider");

        match self.geocoder.lookup(&name).await {
            Ok(Some(coords)) => {
                let location = self.store.upsert(&name, &coords.latitude, &coords.longitude)?;
                tracing::info!(
                    %name,
                    latitude = %location.latitude,
                    longitude = %location.longitude,
                    "stored newly resolved location"
                );
                Ok(Some(location))
            }
            Ok(None) => {
                tracing::warn!(%name, "no geocoding results for location");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(%name, error = %e, "geocoding lookup failed");
                Ok(None)
            }
        }
    }
}
