//! Collection repository contracts and SQLite implementation.
//!
//! Each logical collection is stored as one row whose payload is the JSON
//! array of its entities.

use crate::db::schema::{current_user_version, SCHEMA_VERSION};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Logical records kept in durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Trades,
    Trainees,
    Modules,
    Marks,
    Users,
    IdCounters,
}

impl CollectionKey {
    /// Row key in the `collections` table.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trades => "trades",
            Self::Trainees => "trainees",
            Self::Modules => "modules",
            Self::Marks => "marks",
            Self::Users => "users",
            Self::IdCounters => "id_counters",
        }
    }
}

impl Display for CollectionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from durable collection storage.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection schema is not at the expected version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted payload could not be decoded.
    InvalidData {
        key: CollectionKey,
        message: String,
    },
    /// In-memory state could not be encoded.
    Encode(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "collection repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData { key, message } => {
                write!(f, "invalid persisted `{key}` data: {message}")
            }
            Self::Encode(message) => write!(f, "failed to encode collection: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage contract for whole-collection payloads.
pub trait CollectionRepository {
    /// Loads the raw payload for one collection, `None` when never written.
    fn load(&self, key: CollectionKey) -> RepoResult<Option<String>>;
    /// Writes every `(key, payload)` pair in one transaction.
    fn save_all(&self, entries: &[(CollectionKey, String)]) -> RepoResult<()>;
}

/// SQLite-backed collection repository.
pub struct SqliteCollectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCollectionRepository<'conn> {
    /// Creates a repository from a bootstrapped connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        if actual_version != SCHEMA_VERSION {
            return Err(RepoError::UninitializedConnection {
                expected_version: SCHEMA_VERSION,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl CollectionRepository for SqliteCollectionRepository<'_> {
    fn load(&self, key: CollectionKey) -> RepoResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM collections WHERE key = ?1;",
                [key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn save_all(&self, entries: &[(CollectionKey, String)]) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        for (key, payload) in entries {
            tx.execute(
                "INSERT INTO collections (key, payload, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    payload = excluded.payload,
                    updated_at = excluded.updated_at;",
                params![key.as_str(), payload.as_str()],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// Encodes one collection as its durable JSON payload.
pub fn encode_collection<T: Serialize + ?Sized>(value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|err| RepoError::Encode(err.to_string()))
}

/// Decodes one durable JSON payload, tagging failures with the collection key.
pub fn decode_collection<T: DeserializeOwned>(key: CollectionKey, payload: &str) -> RepoResult<T> {
    serde_json::from_str(payload).map_err(|err| RepoError::InvalidData {
        key,
        message: err.to_string(),
    })
}
