//! On-disk home of the quote cache.
//!
//! `open_db` / `open_db_in_memory` hand back a connection whose `quotes`
//! table is ready for `SqliteQuoteStore::try_new`. Schema upgrades live in
//! [`migrations`] and are tracked through `PRAGMA user_version`.
//!
//! A cache written by a newer build is refused instead of being read with
//! an older row layout.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or upgrading the quote cache.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The cache schema is newer than this build understands.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A schema step failed; nothing from the pending batch was applied.
    Migration {
        version: u32,
        name: &'static str,
        source: rusqlite::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "quote cache error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "quote cache schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Migration {
                version,
                name,
                source,
            } => write!(
                f,
                "quote cache migration {version:04}_{name} failed: {source}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Migration { source, .. } => Some(source),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
