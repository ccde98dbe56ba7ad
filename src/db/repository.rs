use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::db::migrations::{schema_version, SCHEMA_VERSION};
use crate::models::PrayerRecord;

// ─── Errors ──────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database is at schema version {found}, expected {expected}; run migrations first")]
    SchemaMismatch { found: i64, expected: i64 },
}

/// What a `put` actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
    Inserted,
    /// A record for the same (city, date) already existed and was left untouched.
    AlreadyPresent,
}

// ─── Store contract ──────────────────────────────────────────────────────────

/// Persisted prayer times keyed by (city, date).
///
/// Records are write-once: a second `put` for a stored key is ignored and
/// reported as [`PutOutcome::AlreadyPresent`].
pub trait PrayerStore {
    /// Exact-match lookup. `Ok(None)` means nothing is stored for the key.
    fn get(&self, city: &str, date: &str) -> Result<Option<PrayerRecord>, StoreError>;

    fn put(&self, record: &PrayerRecord) -> Result<PutOutcome, StoreError>;
}

// ─── SQLite store ────────────────────────────────────────────────────────────

/// How long a connection waits on another process's lock before giving up.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the database file at `path`. The schema must already be migrated.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        // Other invocations may hold the file; lean on SQLite's own locking.
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::new(conn)
    }

    /// Wrap an existing connection after checking its schema version.
    pub fn new(conn: Connection) -> Result<Self, StoreError> {
        let found = schema_version(&conn)?;
        if found != SCHEMA_VERSION {
            return Err(StoreError::SchemaMismatch {
                found,
                expected: SCHEMA_VERSION,
            });
        }
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::Sqlite(e))
    }
}

impl PrayerStore for SqliteStore {
    fn get(&self, city: &str, date: &str) -> Result<Option<PrayerRecord>, StoreError> {
        let record = self
            .conn
            .query_row(
                "SELECT city, date, fajr, dhuhr, asr, maghrib, isha
                 FROM prayer_times WHERE city = ?1 AND date = ?2",
                params![city, date],
                |row| {
                    Ok(PrayerRecord {
                        city: row.get(0)?,
                        date: row.get(1)?,
                        fajr: row.get(2)?,
                        dhuhr: row.get(3)?,
                        asr: row.get(4)?,
                        maghrib: row.get(5)?,
                        isha: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    fn put(&self, record: &PrayerRecord) -> Result<PutOutcome, StoreError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO prayer_times (city, date, fajr, dhuhr, asr, maghrib, isha)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.city,
                record.date,
                record.fajr,
                record.dhuhr,
                record.asr,
                record.maghrib,
                record.isha,
            ],
        )?;

        if inserted == 0 {
            warn!(
                "Prayer times for {} on {} already cached; keeping the stored row",
                record.city, record.date
            );
            Ok(PutOutcome::AlreadyPresent)
        } else {
            debug!("Cached prayer times for {} on {}", record.city, record.date);
            Ok(PutOutcome::Inserted)
        }
    }
}
