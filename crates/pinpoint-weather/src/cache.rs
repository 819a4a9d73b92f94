//! Time-bounded in-process cache for forecast responses.
//!
//! Identical coordinate requests within the TTL window are answered locally
//! instead of hitting the provider again. Safe for concurrent use; entries
//! are dropped lazily when read past their TTL.

use crate::types::DailyForecast;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_TTL_SECS: u64 = 3600;

#[derive(Debug)]
struct CacheEntry {
    fetched_at: Instant,
    days: Vec<DailyForecast>,
}

/// Read-through response cache keyed by coordinate pair.
#[derive(Debug)]
pub struct ForecastCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl Default for ForecastCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TTL_SECS))
    }
}

impl ForecastCache {
    /// A TTL of zero disables caching entirely.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached forecast for a key if it is still fresh.
    pub fn get(&self, key: &str) -> Option<Vec<DailyForecast>> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.days.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Record a freshly fetched forecast.
    pub fn insert(&self, key: String, days: Vec<DailyForecast>) {
        if self.ttl.is_zero() {
            return;
        }
        self.entries.lock().insert(
            key,
            CacheEntry {
                fetched_at: Instant::now(),
                days,
            },
        );
    }
}
