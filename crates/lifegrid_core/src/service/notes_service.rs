//! Free-text notes store.
//!
//! # Responsibility
//! - Hold the session's notes content in memory.
//! - Persist to the local blob (anonymous) or the per-user row
//!   (authenticated) with full replacement semantics.

use crate::repo::blob_repo::{BlobRepository, NOTES_BLOB_KEY};
use crate::repo::user_row_repo::UserRowRepository;
use crate::repo::RepoResult;
use crate::service::session::{Session, StoreStatus};
use log::error;

/// Notes store bound to one session.
pub struct NotesService<B: BlobRepository, U: UserRowRepository> {
    blobs: B,
    rows: U,
    session: Session,
    content: String,
    status: StoreStatus,
}

impl<B: BlobRepository, U: UserRowRepository> NotesService<B, U> {
    /// Creates the store and loads notes for `session`.
    pub fn load(blobs: B, rows: U, session: Session) -> Self {
        let mut service = Self {
            blobs,
            rows,
            session,
            content: String::new(),
            status: StoreStatus::Idle,
        };
        service.reload();
        service
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> StoreStatus {
        self.status
    }

    pub fn switch_session(&mut self, session: Session) {
        self.session = session;
        self.reload();
    }

    /// Replaces the notes content and persists it.
    pub fn save(&mut self, content: impl Into<String>) {
        self.content = content.into();
        let result = match &self.session {
            Session::Anonymous => self.blobs.put_blob(NOTES_BLOB_KEY, &self.content),
            Session::Authenticated { user_id } => {
                self.rows.upsert_notes_row(user_id, &self.content)
            }
        };
        self.status = match result {
            Ok(()) => StoreStatus::Saved,
            Err(err) => {
                error!(
                    "event=notes_save module=service status=error mode={} error_code=notes_write_failed error={}",
                    self.session.mode(),
                    err
                );
                StoreStatus::ErrorSaving
            }
        };
    }

    fn reload(&mut self) {
        match self.read_raw() {
            Ok(content) => {
                self.content = content.unwrap_or_default();
                self.status = StoreStatus::Loaded;
            }
            Err(err) => {
                error!(
                    "event=notes_load module=service status=error mode={} error_code=notes_read_failed error={}",
                    self.session.mode(),
                    err
                );
                self.content.clear();
                self.status = StoreStatus::ErrorLoading;
            }
        }
    }

    fn read_raw(&self) -> RepoResult<Option<String>> {
        match &self.session {
            Session::Anonymous => self.blobs.get_blob(NOTES_BLOB_KEY),
            Session::Authenticated { user_id } => self.rows.get_notes_row(user_id),
        }
    }
}
