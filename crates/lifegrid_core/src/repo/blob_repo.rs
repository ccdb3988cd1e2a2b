//! Local key/value blob storage.
//!
//! # Responsibility
//! - Persist whole-state JSON blobs for anonymous sessions.
//! - Mirror the browser-style "one blob per fixed key" layout.
//!
//! # Invariants
//! - Writes replace the full value for a key.
//! - Keys are non-blank after trim.

use crate::db::ensure_tables;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Calendar time store (`year -> month -> week -> day`).
pub const CALENDAR_BLOB_KEY: &str = "lifegrid.calendar";
/// Life profile for the anonymous session.
pub const PROFILE_BLOB_KEY: &str = "lifegrid.profile";
/// Free-text notes for the anonymous session.
pub const NOTES_BLOB_KEY: &str = "lifegrid.notes";
/// Reminder fired-set (`reminder id -> ISO timestamp`).
pub const REMINDERS_FIRED_BLOB_KEY: &str = "lifegrid.reminders_fired";

/// Repository interface for local blob storage.
pub trait BlobRepository {
    /// Reads one blob, `None` when the key was never written.
    fn get_blob(&self, key: &str) -> RepoResult<Option<String>>;
    /// Inserts or replaces one blob.
    fn put_blob(&self, key: &str, value: &str) -> RepoResult<()>;
    /// Deletes one blob. Returns whether a value existed.
    fn delete_blob(&self, key: &str) -> RepoResult<bool>;
}

/// SQLite-backed blob repository over `local_blobs`.
pub struct SqliteBlobRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBlobRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["local_blobs"])?;
        Ok(Self { conn })
    }
}

impl BlobRepository for SqliteBlobRepository<'_> {
    fn get_blob(&self, key: &str) -> RepoResult<Option<String>> {
        let key = normalize_key(key)?;
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_blobs WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn put_blob(&self, key: &str, value: &str) -> RepoResult<()> {
        let key = normalize_key(key)?;
        self.conn.execute(
            "INSERT INTO local_blobs (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete_blob(&self, key: &str) -> RepoResult<bool> {
        let key = normalize_key(key)?;
        let changed = self
            .conn
            .execute("DELETE FROM local_blobs WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

fn normalize_key(key: &str) -> RepoResult<&str> {
    let trimmed = key.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}
