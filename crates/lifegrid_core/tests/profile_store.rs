use lifegrid_core::db::open_db_in_memory;
use lifegrid_core::repo::blob_repo::{BlobRepository, SqliteBlobRepository, PROFILE_BLOB_KEY};
use lifegrid_core::repo::user_row_repo::{SqliteUserRowRepository, UserRowRepository};
use lifegrid_core::repo::{RepoError, RepoResult};
use lifegrid_core::{
    CategoryName, LifeProfile, ProfileService, ProfileValidationError, Session, StoreStatus,
    MINUTES_PER_DAY,
};

/// Storage that accepts reads and rejects every write.
struct ReadOnlyStorage;

impl BlobRepository for ReadOnlyStorage {
    fn get_blob(&self, _key: &str) -> RepoResult<Option<String>> {
        Ok(None)
    }

    fn put_blob(&self, key: &str, _value: &str) -> RepoResult<()> {
        Err(RepoError::InvalidKey(key.to_string()))
    }

    fn delete_blob(&self, _key: &str) -> RepoResult<bool> {
        Ok(false)
    }
}

impl UserRowRepository for ReadOnlyStorage {
    fn get_profile_row(&self, _user_id: &str) -> RepoResult<Option<String>> {
        Ok(None)
    }

    fn upsert_profile_row(&self, user_id: &str, _profile_json: &str) -> RepoResult<()> {
        Err(RepoError::InvalidUserId(user_id.to_string()))
    }

    fn get_notes_row(&self, _user_id: &str) -> RepoResult<Option<String>> {
        Ok(None)
    }

    fn upsert_notes_row(&self, user_id: &str, _content: &str) -> RepoResult<()> {
        Err(RepoError::InvalidUserId(user_id.to_string()))
    }

    fn delete_user_rows(&self, _user_id: &str) -> RepoResult<()> {
        Ok(())
    }
}

fn onboarding_entries() -> Vec<(CategoryName, i64)> {
    vec![
        (CategoryName::Sleep, 450),
        (CategoryName::WorkStudy, 540),
        (CategoryName::Social, 90),
        (CategoryName::Exercise, 45),
        (CategoryName::Hobbies, 120),
    ]
}

#[test]
fn onboarding_allocations_sum_to_a_day() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProfileService::load(
        SqliteBlobRepository::try_new(&conn).unwrap(),
        SqliteUserRowRepository::try_new(&conn).unwrap(),
        Session::Anonymous,
    );

    service.complete_onboarding(31, 85, &onboarding_entries()).unwrap();

    let profile = service.profile();
    assert_eq!(profile.total_minutes(), MINUTES_PER_DAY);
    assert_eq!(profile.minutes_for(CategoryName::Unallocated), 195);
    assert_eq!(profile.years_left(), 54);
    assert_eq!(service.status(), StoreStatus::Saved);
}

#[test]
fn anonymous_profile_lives_in_local_blob() {
    let conn = open_db_in_memory().unwrap();
    let blobs = SqliteBlobRepository::try_new(&conn).unwrap();
    let rows = SqliteUserRowRepository::try_new(&conn).unwrap();
    let mut service = ProfileService::load(
        SqliteBlobRepository::try_new(&conn).unwrap(),
        SqliteUserRowRepository::try_new(&conn).unwrap(),
        Session::Anonymous,
    );

    service.set_allocation(CategoryName::Exercise, 90).unwrap();

    let raw = blobs.get_blob(PROFILE_BLOB_KEY).unwrap().unwrap();
    let stored = serde_json::from_str::<LifeProfile>(&raw).unwrap();
    assert_eq!(stored.minutes_for(CategoryName::Exercise), 90);
    assert_eq!(rows.get_profile_row("anyone").unwrap(), None);
}

#[test]
fn authenticated_profile_is_upserted_per_user() {
    let conn = open_db_in_memory().unwrap();
    let rows = SqliteUserRowRepository::try_new(&conn).unwrap();
    let mut service = ProfileService::load(
        SqliteBlobRepository::try_new(&conn).unwrap(),
        SqliteUserRowRepository::try_new(&conn).unwrap(),
        Session::authenticated("user-7"),
    );
    assert_eq!(service.profile(), &LifeProfile::default());

    service.set_ages(30, 90).unwrap();
    service.set_ages(32, 90).unwrap();

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM user_profiles WHERE user_id = 'user-7';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
    let raw = rows.get_profile_row("user-7").unwrap().unwrap();
    assert_eq!(
        serde_json::from_str::<LifeProfile>(&raw).unwrap().current_age,
        32
    );

    let reloaded = ProfileService::load(
        SqliteBlobRepository::try_new(&conn).unwrap(),
        SqliteUserRowRepository::try_new(&conn).unwrap(),
        Session::authenticated("user-7"),
    );
    assert_eq!(reloaded.profile().current_age, 32);
}

#[test]
fn switching_session_reloads_from_the_other_backend() {
    let conn = open_db_in_memory().unwrap();
    let mut service = ProfileService::load(
        SqliteBlobRepository::try_new(&conn).unwrap(),
        SqliteUserRowRepository::try_new(&conn).unwrap(),
        Session::Anonymous,
    );
    service.set_ages(40, 70).unwrap();

    service.switch_session(Session::authenticated("user-1"));
    assert_eq!(service.session().user_id(), Some("user-1"));
    assert_eq!(service.profile().current_age, 25);

    service.switch_session(Session::Anonymous);
    assert_eq!(service.profile().current_age, 40);
}

#[test]
fn corrupt_or_invalid_blob_falls_back_to_default() {
    let conn = open_db_in_memory().unwrap();
    let blobs = SqliteBlobRepository::try_new(&conn).unwrap();

    blobs.put_blob(PROFILE_BLOB_KEY, "not json").unwrap();
    let service = ProfileService::load(
        SqliteBlobRepository::try_new(&conn).unwrap(),
        SqliteUserRowRepository::try_new(&conn).unwrap(),
        Session::Anonymous,
    );
    assert_eq!(service.status(), StoreStatus::ErrorLoading);
    assert_eq!(service.profile(), &LifeProfile::default());

    // Well-formed JSON that breaks the age invariant.
    let mut broken = LifeProfile::default();
    broken.target_age = broken.current_age;
    blobs
        .put_blob(PROFILE_BLOB_KEY, &serde_json::to_string(&broken).unwrap())
        .unwrap();
    let service = ProfileService::load(
        SqliteBlobRepository::try_new(&conn).unwrap(),
        SqliteUserRowRepository::try_new(&conn).unwrap(),
        Session::Anonymous,
    );
    assert_eq!(service.status(), StoreStatus::ErrorLoading);
    assert_eq!(service.profile(), &LifeProfile::default());
}

#[test]
fn failed_write_keeps_edit_and_reports_error_saving() {
    let mut service = ProfileService::load(
        ReadOnlyStorage,
        ReadOnlyStorage,
        Session::authenticated("user-2"),
    );
    assert_eq!(service.status(), StoreStatus::Loaded);

    service.set_allocation(CategoryName::Hobbies, 200).unwrap();

    assert_eq!(service.status(), StoreStatus::ErrorSaving);
    assert_eq!(service.status().to_string(), "Error saving");
    assert_eq!(service.profile().minutes_for(CategoryName::Hobbies), 200);
}

#[test]
fn rejected_edits_do_not_touch_storage() {
    let conn = open_db_in_memory().unwrap();
    let blobs = SqliteBlobRepository::try_new(&conn).unwrap();
    let mut service = ProfileService::load(
        SqliteBlobRepository::try_new(&conn).unwrap(),
        SqliteUserRowRepository::try_new(&conn).unwrap(),
        Session::Anonymous,
    );

    assert_eq!(
        service.set_allocation(CategoryName::Unallocated, 10),
        Err(ProfileValidationError::UnallocatedIsDerived)
    );
    assert!(matches!(
        service.set_ages(60, 60),
        Err(ProfileValidationError::InvalidAgeRange { .. })
    ));
    assert_eq!(blobs.get_blob(PROFILE_BLOB_KEY).unwrap(), None);
    assert_eq!(service.status(), StoreStatus::Loaded);
}

#[test]
fn reset_restores_default_and_account_rows_can_be_deleted() {
    let conn = open_db_in_memory().unwrap();
    let rows = SqliteUserRowRepository::try_new(&conn).unwrap();
    let mut service = ProfileService::load(
        SqliteBlobRepository::try_new(&conn).unwrap(),
        SqliteUserRowRepository::try_new(&conn).unwrap(),
        Session::authenticated("user-3"),
    );
    service.complete_onboarding(20, 75, &onboarding_entries()).unwrap();

    service.reset();
    assert_eq!(service.profile(), &LifeProfile::default());
    assert!(rows.get_profile_row("user-3").unwrap().is_some());

    rows.delete_user_rows("user-3").unwrap();
    assert_eq!(rows.get_profile_row("user-3").unwrap(), None);
}
