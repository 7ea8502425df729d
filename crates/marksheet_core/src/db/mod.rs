//! SQLite access layer for the records file.
//!
//! # Responsibility
//! - Hand out bootstrapped connections (`open_db`, `open_db_in_memory`).
//! - Report storage-level failures as one error type for the repository.
//!
//! # Invariants
//! - `PRAGMA user_version` carries the schema version of the file.
//! - A file stamped by a newer build is refused and left untouched.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

/// Storage-level failure while opening or bootstrapping the records file.
#[derive(Debug)]
pub enum DbError {
    /// Error reported by SQLite itself.
    Sqlite(rusqlite::Error),
    /// The file was written by a build with a newer schema.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

pub type DbResult<T> = Result<T, DbError>;

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "records file uses schema {db_version}; this build reads up to {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            return Some(err);
        }
        None
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;
    use std::error::Error;

    #[test]
    fn newer_schema_message_names_both_versions() {
        let err = DbError::UnsupportedSchemaVersion {
            db_version: 3,
            latest_supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "records file uses schema 3; this build reads up to 1"
        );
        assert!(err.source().is_none());
    }
}
