//! Key-value state repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide get/put/remove over whole JSON-encoded state values.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `put` replaces the full value stored under a key.
//! - Keys are limited to the fixed `StateKey` set.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for state persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Json(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid state json: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted state: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidData(_) => None,
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

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Names of the persisted state values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    Boards,
    Notes,
    SelectedBoard,
    ViewMode,
}

impl StateKey {
    pub const ALL: [StateKey; 4] = [
        StateKey::Boards,
        StateKey::Notes,
        StateKey::SelectedBoard,
        StateKey::ViewMode,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Boards => "boards",
            Self::Notes => "notes",
            Self::SelectedBoard => "selectedBoard",
            Self::ViewMode => "viewMode",
        }
    }
}

impl Display for StateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository interface for whole-value state persistence.
pub trait StateRepository {
    /// Returns the raw JSON text stored under `key`.
    fn get(&self, key: StateKey) -> RepoResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn put(&self, key: StateKey, value: &str) -> RepoResult<()>;
    /// Removes `key`. Removing a missing key is not an error.
    fn remove(&self, key: StateKey) -> RepoResult<()>;
}

/// Reads and decodes the JSON value stored under `key`.
pub fn read_json<R, T>(repo: &R, key: StateKey) -> RepoResult<Option<T>>
where
    R: StateRepository + ?Sized,
    T: DeserializeOwned,
{
    match repo.get(key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Encodes `value` as JSON and stores it under `key`.
pub fn write_json<R, T>(repo: &R, key: StateKey, value: &T) -> RepoResult<()>
where
    R: StateRepository + ?Sized,
    T: Serialize + ?Sized,
{
    let text = serde_json::to_string(value)?;
    repo.put(key, &text)
}

/// SQLite-backed state repository over the `kv_entries` table.
pub struct SqliteStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStateRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - Returns `InvalidData` when the `kv_entries` table is missing.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StateRepository for SqliteStateRepository<'_> {
    fn get(&self, key: StateKey) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put(&self, key: StateKey, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key.as_str(), value],
        )?;
        Ok(())
    }

    fn remove(&self, key: StateKey) -> RepoResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key.as_str()])?;
        Ok(())
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
        );",
        [],
        |row| row.get(0),
    )?;

    if exists == 0 {
        return Err(RepoError::InvalidData(
            "kv_entries table missing; open the database through db::open_db".to_string(),
        ));
    }
    Ok(())
}
