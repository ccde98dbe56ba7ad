use anyhow::{Context, Result};
use log::debug;
use rusqlite::Connection;
use std::path::Path;

use crate::db::repository::BUSY_TIMEOUT;

/// Ordered schema steps. Step `i` moves the database from version `i` to `i + 1`.
const MIGRATIONS: &[&str] = &[
    "
    CREATE TABLE IF NOT EXISTS prayer_times (
        city        TEXT NOT NULL,
        date        TEXT NOT NULL,
        fajr        TEXT NOT NULL,
        dhuhr       TEXT NOT NULL,
        asr         TEXT NOT NULL,
        maghrib     TEXT NOT NULL,
        isha        TEXT NOT NULL,
        created_at  TEXT DEFAULT (datetime('now')),
        PRIMARY KEY (city, date)
    );
    ",
];

/// Schema version the store expects to find.
pub const SCHEMA_VERSION: i64 = MIGRATIONS.len() as i64;

pub fn schema_version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Bring the database up to [`SCHEMA_VERSION`], one transaction per step.
pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let current = schema_version(conn).context("Reading schema version")?;

    for (idx, sql) in MIGRATIONS.iter().enumerate().skip(current.max(0) as usize) {
        let target = idx as i64 + 1;
        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .with_context(|| format!("Applying migration {}", target))?;
        tx.pragma_update(None, "user_version", target)?;
        tx.commit()?;
        debug!("Migrated prayer-times database to version {}", target);
    }
    Ok(())
}

/// Open the database file at `path` and migrate it. Waits out another
/// invocation that is migrating the same file at the same moment.
pub fn prepare_database(path: &Path) -> Result<()> {
    let mut conn =
        Connection::open(path).with_context(|| format!("Opening database at {:?}", path))?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    run_migrations(&mut conn)
}
