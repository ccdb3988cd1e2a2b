//! Life profile store.
//!
//! # Responsibility
//! - Own the session's `LifeProfile` as the in-memory source of truth.
//! - Route persistence to local blobs (anonymous) or per-user rows
//!   (authenticated).
//!
//! # Invariants
//! - Load failures degrade to the default profile, never to an error.
//! - Save failures keep the in-memory edit and flip status to `ErrorSaving`.
//! - Validation failures reject the edit before anything is persisted.

use crate::model::category::CategoryName;
use crate::model::profile::{LifeProfile, ProfileValidationError};
use crate::repo::blob_repo::{BlobRepository, PROFILE_BLOB_KEY};
use crate::repo::user_row_repo::UserRowRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::session::{Session, StoreStatus};
use log::{error, info, warn};

/// Profile store bound to one session.
pub struct ProfileService<B: BlobRepository, U: UserRowRepository> {
    blobs: B,
    rows: U,
    session: Session,
    profile: LifeProfile,
    status: StoreStatus,
}

impl<B: BlobRepository, U: UserRowRepository> ProfileService<B, U> {
    /// Creates the store and loads the profile for `session`.
    pub fn load(blobs: B, rows: U, session: Session) -> Self {
        let mut service = Self {
            blobs,
            rows,
            session,
            profile: LifeProfile::default(),
            status: StoreStatus::Idle,
        };
        service.reload();
        service
    }

    pub fn profile(&self) -> &LifeProfile {
        &self.profile
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> StoreStatus {
        self.status
    }

    /// Switches to another session (sign-in/sign-out) and reloads.
    pub fn switch_session(&mut self, session: Session) {
        self.session = session;
        self.reload();
    }

    /// Replaces the profile with onboarding input and persists it.
    pub fn complete_onboarding(
        &mut self,
        current_age: u32,
        target_age: u32,
        entries: &[(CategoryName, i64)],
    ) -> Result<(), ProfileValidationError> {
        self.profile = LifeProfile::from_onboarding(current_age, target_age, entries)?;
        self.persist();
        Ok(())
    }

    /// Edits one allocation; `Unallocated` is rebalanced.
    pub fn set_allocation(
        &mut self,
        name: CategoryName,
        minutes: i64,
    ) -> Result<i64, ProfileValidationError> {
        let applied = self.profile.set_allocation(name, minutes)?;
        self.persist();
        Ok(applied)
    }

    pub fn set_ages(
        &mut self,
        current_age: u32,
        target_age: u32,
    ) -> Result<(), ProfileValidationError> {
        self.profile.set_ages(current_age, target_age)?;
        self.persist();
        Ok(())
    }

    /// Replaces the profile with the default one and persists it.
    pub fn reset(&mut self) {
        self.profile = LifeProfile::default();
        self.persist();
    }

    fn reload(&mut self) {
        let (profile, status) = match self.read_raw() {
            Ok(None) => (LifeProfile::default(), StoreStatus::Loaded),
            Ok(Some(raw)) => match decode_profile(&raw) {
                Some(profile) => (profile, StoreStatus::Loaded),
                None => {
                    warn!(
                        "event=profile_load module=service status=error mode={} error_code=profile_decode_failed",
                        self.session.mode()
                    );
                    (LifeProfile::default(), StoreStatus::ErrorLoading)
                }
            },
            Err(err) => {
                error!(
                    "event=profile_load module=service status=error mode={} error_code=profile_read_failed error={}",
                    self.session.mode(),
                    err
                );
                (LifeProfile::default(), StoreStatus::ErrorLoading)
            }
        };
        self.profile = profile;
        self.status = status;
        info!(
            "event=profile_load module=service status={} mode={}",
            if status.is_error() { "degraded" } else { "ok" },
            self.session.mode()
        );
    }

    fn read_raw(&self) -> RepoResult<Option<String>> {
        match &self.session {
            Session::Anonymous => self.blobs.get_blob(PROFILE_BLOB_KEY),
            Session::Authenticated { user_id } => self.rows.get_profile_row(user_id),
        }
    }

    fn persist(&mut self) {
        let result = serde_json::to_string(&self.profile)
            .map_err(|err| err.to_string())
            .and_then(|json| self.write_raw(&json).map_err(|err| err.to_string()));
        self.status = match result {
            Ok(()) => StoreStatus::Saved,
            Err(err) => {
                error!(
                    "event=profile_save module=service status=error mode={} error_code=profile_write_failed error={}",
                    self.session.mode(),
                    err
                );
                StoreStatus::ErrorSaving
            }
        };
    }

    fn write_raw(&self, json: &str) -> Result<(), RepoError> {
        match &self.session {
            Session::Anonymous => self.blobs.put_blob(PROFILE_BLOB_KEY, json),
            Session::Authenticated { user_id } => self.rows.upsert_profile_row(user_id, json),
        }
    }
}

fn decode_profile(raw: &str) -> Option<LifeProfile> {
    let profile = serde_json::from_str::<LifeProfile>(raw).ok()?;
    profile.validate().ok()?;
    Some(profile)
}
