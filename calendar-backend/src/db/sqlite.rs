//! SQLite database handle backed by an r2d2 connection pool.
//!
//! Table operations live in `db/tables/*` as `impl Database` blocks.

use chrono::{DateTime, NaiveDate, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use std::path::Path;
use std::time::Duration;

use crate::config::defaults;
use crate::error::{AppError, AppResult};

pub type DbConn = r2d2::PooledConnection<SqliteConnectionManager>;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS calendar_days (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        day_type TEXT NOT NULL DEFAULT 'work_day'
    );
    CREATE UNIQUE INDEX IF NOT EXISTS idx_calendar_days_date ON calendar_days(date);

    CREATE TABLE IF NOT EXISTS notes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        day_id INTEGER REFERENCES calendar_days(id) ON DELETE CASCADE,
        text TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_notes_day_id ON notes(day_id);
";

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open (or create) the database file and make sure the schema exists
    pub fn new(database_url: &str) -> AppResult<Self> {
        Self::with_pool_size(database_url, defaults::DATABASE_POOL_SIZE)
    }

    pub fn with_pool_size(database_url: &str, pool_size: u32) -> AppResult<Self> {
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Config(format!(
                        "cannot create database directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let manager = SqliteConnectionManager::file(database_url).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")
        });
        let pool = Pool::builder().max_size(pool_size).build(manager)?;

        let db = Self { pool };
        db.conn()?.execute_batch(SCHEMA)?;
        Ok(db)
    }

    /// Check out a pooled connection
    pub fn conn(&self) -> AppResult<DbConn> {
        Ok(self.pool.get()?)
    }
}

pub(crate) fn parse_date(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

pub(crate) fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Throwaway database in a temp dir; keep the `TempDir` alive for the test's duration
#[cfg(test)]
pub(crate) fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calendar.db");
    let db = Database::new(path.to_str().unwrap()).expect("Failed to create database");
    (dir, db)
}
