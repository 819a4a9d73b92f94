//! Durable keyed storage mapping canonical location names to coordinates.
//!
//! One row per canonical name. Coordinates are stored as TEXT so the
//! geocoding provider's textual precision survives unchanged.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;

const SCHEMA_VERSION: i32 = 1;

/// A resolved location as persisted in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredLocation {
    pub name: String,
    pub latitude: String,
    pub longitude: String,
}

/// SQLite-backed location store.
///
/// The connection is mutex-wrapped so the store can be shared across
/// request handlers behind an `Arc`.
pub struct LocationStore {
    conn: Mutex<Connection>,
}

impl LocationStore {
    /// Open or create the database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).context("Failed to open locations database")?;
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema()?;
        Ok(store)
    }

    /// Create an in-memory store (used by tests and ephemeral deployments).
    pub fn in_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().context("Failed to open in-memory locations database")?;
        let store = Self { conn: Mutex::new(conn) };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);

            CREATE TABLE IF NOT EXISTS locations (
                name TEXT PRIMARY KEY,
                latitude TEXT NOT NULL,
                longitude TEXT NOT NULL
            );",
        )
        .context("Failed to initialize schema")?;

        let version: Option<i32> = conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get(0))
            .optional()?;
        if version.is_none() {
            conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;
        }

        Ok(())
    }

    /// Look up a location by its canonical name.
    pub fn get(&self, name: &str) -> Result<Option<StoredLocation>> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT name, latitude, longitude FROM locations WHERE name = ?1")?;

        let location = stmt
            .query_row([name], |row| {
                Ok(StoredLocation {
                    name: row.get(0)?,
                    latitude: row.get(1)?,
                    longitude: row.get(2)?,
                })
            })
            .optional()?;

        Ok(location)
    }

    /// Insert or replace the record for a canonical name.
    ///
    /// The whole row is written in one statement, so concurrent writers for
    /// the same name converge on a complete record (last writer wins).
    pub fn upsert(&self, name: &str, latitude: &str, longitude: &str) -> Result<StoredLocation> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO locations (name, latitude, longitude)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET
                latitude = excluded.latitude,
                longitude = excluded.longitude",
            params![name, latitude, longitude],
        )?;

        Ok(StoredLocation {
            name: name.to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        })
    }

    /// Number of stored locations.
    pub fn count(&self) -> Result<i64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_get_missing_returns_none() {
        let store = LocationStore::in_memory().unwrap();
        assert!(store.get("NOWHERE").unwrap().is_none());
    }

    #[test]
    fn test_upsert_then_get() {
        let store = LocationStore::in_memory().unwrap();
        store.upsert("NEW YORK", "40.7128", "-74.0060").unwrap();

        let location = store.get("NEW YORK").unwrap().unwrap();
        assert_eq!(location.name, "NEW YORK");
        assert_eq!(location.latitude, "40.7128");
        assert_eq!(location.longitude, "-74.0060");
    }

    #[test]
    fn test_upsert_replaces_whole_record() {
        let store = LocationStore::in_memory().unwrap();
        store.upsert("OSLO", "59.9", "10.7").unwrap();
        store.upsert("OSLO", "59.9139", "10.7522").unwrap();

        let location = store.get("OSLO").unwrap().unwrap();
        assert_eq!(location.latitude, "59.9139");
        assert_eq!(location.longitude, "10.7522");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_coordinates_keep_textual_precision() {
        let store = LocationStore::in_memory().unwrap();
        store.upsert("ZERO", "0.0000000", "-0.10").unwrap();

        let location = store.get("ZERO").unwrap().unwrap();
        assert_eq!(location.latitude, "0.0000000");
        assert_eq!(location.longitude, "-0.10");
    }

    #[test]
    fn test_key_lookup_is_exact() {
        let store = LocationStore::in_memory().unwrap();
        store.upsert("LONDON", "51.5074", "-0.1278").unwrap();

        // Canonicalization happens above the store; the key itself is exact.
        assert!(store.get("london").unwrap().is_none());
        assert!(store.get("LONDON").unwrap().is_some());
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("locations.db");

        {
            let store = LocationStore::open(&db_path).unwrap();
            store.upsert("PARIS", "48.8566", "2.3522").unwrap();
        }

        let store = LocationStore::open(&db_path).unwrap();
        let location = store.get("PARIS").unwrap().unwrap();
        assert_eq!(location.latitude, "48.8566");
    }
}
