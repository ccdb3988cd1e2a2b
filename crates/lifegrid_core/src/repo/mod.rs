//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the persistence contracts services depend on.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Local state is stored as opaque JSON/text blobs under fixed keys.
//! - Per-user rows use insert-or-replace (upsert) semantics; concurrent
//!   writers for one user overwrite each other.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod blob_repo;
pub mod user_row_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error shared by blob and user-row storage.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidKey(String),
    InvalidUserId(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid blob key: `{key}`"),
            Self::InvalidUserId(user_id) => write!(f, "invalid user id: `{user_id}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) | Self::InvalidUserId(_) => None,
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
