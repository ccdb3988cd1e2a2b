//! Calendar use-case service.
//!
//! # Responsibility
//! - Load the calendar time store from its local blob at startup.
//! - Validate task input and persist the store after every mutation.
//!
//! # Invariants
//! - The in-memory `CalendarStore` is the session's source of truth; a failed
//!   save keeps the edit and reports `ErrorSaving`.
//! - A corrupt blob loads as an empty store with `ErrorLoading`.

use crate::calendar::store::CalendarStore;
use crate::model::calendar::{DailyTask, DayRecord, TaskId, TaskValidationError, YearRecord};
use crate::repo::blob_repo::{BlobRepository, CALENDAR_BLOB_KEY};
use crate::service::session::StoreStatus;
use chrono::Datelike;
use log::{error, info, warn};

/// Calendar store facade with blob persistence.
pub struct CalendarService<B: BlobRepository> {
    blobs: B,
    store: CalendarStore,
    status: StoreStatus,
}

impl<B: BlobRepository> CalendarService<B> {
    /// Creates the service and loads the persisted store.
    pub fn load(blobs: B) -> Self {
        let mut legacy_tasks = 0;
        let (store, status) = match blobs.get_blob(CALENDAR_BLOB_KEY) {
            Ok(None) => (CalendarStore::new(), StoreStatus::Loaded),
            Ok(Some(raw)) => match CalendarStore::from_json_counting_new_ids(&raw) {
                Ok((store, new_ids)) => {
                    legacy_tasks = new_ids;
                    (store, StoreStatus::Loaded)
                }
                Err(err) => {
                    warn!(
                        "event=calendar_load module=service status=error error_code=calendar_decode_failed error={}",
                        err
                    );
                    (CalendarStore::new(), StoreStatus::ErrorLoading)
                }
            },
            Err(err) => {
                error!(
                    "event=calendar_load module=service status=error error_code=calendar_read_failed error={}",
                    err
                );
                (CalendarStore::new(), StoreStatus::ErrorLoading)
            }
        };
        info!(
            "event=calendar_load module=service status={} cells={}",
            if status.is_error() { "degraded" } else { "ok" },
            store.cells().count()
        );
        let mut service = Self {
            blobs,
            store,
            status,
        };
        if legacy_tasks > 0 {
            // Ids assigned while decoding must survive the next load.
            info!(
                "event=calendar_load module=service status=repair assigned_ids={}",
                legacy_tasks
            );
            service.persist();
        }
        service
    }

    /// Read-only view for scanners and search.
    pub fn store(&self) -> &CalendarStore {
        &self.store
    }

    pub fn status(&self) -> StoreStatus {
        self.status
    }

    pub fn get_day_data<D: Datelike>(&self, date: &D) -> DayRecord {
        self.store.get_day_data(date)
    }

    pub fn get_year_data(&self, year: i32) -> YearRecord {
        self.store.get_year_data(year)
    }

    /// Replaces one day record after validating every task in it.
    pub fn update_day_data<D: Datelike>(
        &mut self,
        date: &D,
        record: DayRecord,
    ) -> Result<(), TaskValidationError> {
        for task in &record.goals {
            task.validate()?;
        }
        self.store.update_day_data(date, record);
        self.persist();
        Ok(())
    }

    /// Appends one validated task to the day and returns its id.
    pub fn add_task_to_day<D: Datelike>(
        &mut self,
        date: &D,
        task: DailyTask,
    ) -> Result<TaskId, TaskValidationError> {
        task.validate()?;
        let id = self.store.add_task_to_day(date, task);
        self.persist();
        Ok(id)
    }

    /// Replaces one task by id. Returns `Ok(false)` when the id is unknown.
    pub fn update_task<D: Datelike>(
        &mut self,
        date: &D,
        task: DailyTask,
    ) -> Result<bool, TaskValidationError> {
        task.validate()?;
        let found = self.store.update_task(date, task);
        if found {
            self.persist();
        }
        Ok(found)
    }

    pub fn set_task_completed<D: Datelike>(&mut self, date: &D, id: TaskId, completed: bool) -> bool {
        let found = self.store.set_task_completed(date, id, completed);
        if found {
            self.persist();
        }
        found
    }

    pub fn remove_task<D: Datelike>(&mut self, date: &D, id: TaskId) -> bool {
        let found = self.store.remove_task(date, id);
        if found {
            self.persist();
        }
        found
    }

    pub fn update_year_title(&mut self, year: i32, title: impl Into<String>) {
        self.store.update_year_title(year, title);
        self.persist();
    }

    fn persist(&mut self) {
        let result = self
            .store
            .to_json()
            .map_err(|err| err.to_string())
            .and_then(|json| {
                self.blobs
                    .put_blob(CALENDAR_BLOB_KEY, &json)
                    .map_err(|err| err.to_string())
            });
        self.status = match result {
            Ok(()) => StoreStatus::Saved,
            Err(err) => {
                error!(
                    "event=calendar_save module=service status=error error_code=calendar_write_failed error={}",
                    err
                );
                StoreStatus::ErrorSaving
            }
        };
    }
}
