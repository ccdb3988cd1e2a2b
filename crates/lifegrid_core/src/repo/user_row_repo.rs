//! Per-user row storage for authenticated sessions.
//!
//! # Responsibility
//! - Persist the serialized life profile and notes content per user.
//!
//! # Invariants
//! - One row per user per table, keyed by `user_id`.
//! - Writes are upserts: insert when absent, replace otherwise.

use crate::db::ensure_tables;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Repository interface for per-user rows.
pub trait UserRowRepository {
    fn get_profile_row(&self, user_id: &str) -> RepoResult<Option<String>>;
    fn upsert_profile_row(&self, user_id: &str, profile_json: &str) -> RepoResult<()>;
    fn get_notes_row(&self, user_id: &str) -> RepoResult<Option<String>>;
    fn upsert_notes_row(&self, user_id: &str, content: &str) -> RepoResult<()>;
    /// Removes every row owned by `user_id` (account deletion).
    fn delete_user_rows(&self, user_id: &str) -> RepoResult<()>;
}

/// SQLite-backed per-user row repository.
pub struct SqliteUserRowRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRowRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["user_profiles", "user_notes"])?;
        Ok(Self { conn })
    }
}

impl UserRowRepository for SqliteUserRowRepository<'_> {
    fn get_profile_row(&self, user_id: &str) -> RepoResult<Option<String>> {
        let user_id = normalize_user_id(user_id)?;
        let value = self
            .conn
            .query_row(
                "SELECT profile_json FROM user_profiles WHERE user_id = ?1;",
                [user_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn upsert_profile_row(&self, user_id: &str, profile_json: &str) -> RepoResult<()> {
        let user_id = normalize_user_id(user_id)?;
        self.conn.execute(
            "INSERT INTO user_profiles (user_id, profile_json)
             VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET
                profile_json = excluded.profile_json,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![user_id, profile_json],
        )?;
        Ok(())
    }

    fn get_notes_row(&self, user_id: &str) -> RepoResult<Option<String>> {
        let user_id = normalize_user_id(user_id)?;
        let value = self
            .conn
            .query_row(
                "SELECT content FROM user_notes WHERE user_id = ?1;",
                [user_id],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn upsert_notes_row(&self, user_id: &str, content: &str) -> RepoResult<()> {
        let user_id = normalize_user_id(user_id)?;
        self.conn.execute(
            "INSERT INTO user_notes (user_id, content)
             VALUES (?1, ?2)
             ON CONFLICT(user_id) DO UPDATE SET
                content = excluded.content,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![user_id, content],
        )?;
        Ok(())
    }

    fn delete_user_rows(&self, user_id: &str) -> RepoResult<()> {
        let user_id = normalize_user_id(user_id)?;
        self.conn
            .execute("DELETE FROM user_profiles WHERE user_id = ?1;", [user_id])?;
        self.conn
            .execute("DELETE FROM user_notes WHERE user_id = ?1;", [user_id])?;
        Ok(())
    }
}

fn normalize_user_id(user_id: &str) -> RepoResult<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(RepoError::InvalidUserId(user_id.to_string()));
    }
    Ok(trimmed)
}
