//! Tests for the user service.

use std::sync::Arc;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockUserRepository;
use crate::test_support::FixtureClock;
use chrono::NaiveDate;
use rstest::rstest;
use serde_json::json;

fn make_service(repo: MockUserRepository) -> UserService<MockUserRepository> {
    UserService::new(Arc::new(repo), UserValidator::new(Arc::new(FixtureClock::on(2024, 6, 1))))
}

fn ada_draft() -> UserDraft {
    UserDraft::new("Ada", "Lovelace", "ada1", "1905-12-10")
}

fn ada(id: i64) -> User {
    User::new(
        UserId::new(id).expect("valid id"),
        UserFields::from_trusted_parts(
            "Ada".to_owned(),
            "Lovelace".to_owned(),
            "ada1".to_owned(),
            NaiveDate::from_ymd_opt(1905, 12, 10).expect("valid date"),
        ),
    )
}

#[tokio::test]
async fn create_persists_validated_fields() {
    let mut repo = MockUserRepository::new();
    repo.expect_create()
        .withf(|fields| fields.username() == "ada1" && fields.first_name() == "Ada")
        .times(1)
        .return_once(|_| Ok(ada(1)));

    let user = make_service(repo)
        .create_user(UserDraft::new(" Ada ", "Lovelace", "ada1 ", "1905-12-10"))
        .await
        .expect("create succeeds");
    assert_eq!(user, ada(1));
}

#[tokio::test]
async fn create_rejects_invalid_draft_without_touching_store() {
    let mut repo = MockUserRepository::new();
    repo.expect_create().never();

    let error = make_service(repo)
        .create_user(UserDraft::new("Ada", "Lovelace", "a", "1905-12-10"))
        .await
        .expect_err("validation failure");
    assert_eq!(error.code(), ErrorCode::ValidationFailed);
    assert_eq!(error.message(), "username must be between 3 and 16 characters");
    assert_eq!(
        error.details(),
        Some(&json!({ "field": "username", "code": "length" }))
    );
}

#[tokio::test]
async fn malformed_date_is_a_malformed_request() {
    let mut repo = MockUserRepository::new();
    repo.expect_create().never();

    let error = make_service(repo)
        .create_user(UserDraft::new("Ada", "Lovelace", "ada1", "10/12/1905"))
        .await
        .expect_err("parse failure");
    assert_eq!(error.code(), ErrorCode::MalformedRequest);
    assert_eq!(error.message(), "Invalid date format");
}

#[tokio::test]
async fn future_date_uses_injected_clock() {
    let mut repo = MockUserRepository::new();
    repo.expect_create().never();

    let error = make_service(repo)
        .create_user(UserDraft::new("Ada", "Lovelace", "ada1", "2024-06-02"))
        .await
        .expect_err("future date");
    assert_eq!(error.message(), "date of birth cannot be in the future");
}

#[rstest]
#[case(UserPersistenceError::duplicate_username("ada1"), ErrorCode::DuplicateUsername, "Username already exists")]
#[case(UserPersistenceError::not_found(9_i64), ErrorCode::NotFound, "user not found")]
#[case(UserPersistenceError::connection("refused"), ErrorCode::StorageUnavailable, "user repository unavailable: refused")]
#[case(UserPersistenceError::timeout("update"), ErrorCode::StorageUnavailable, "user repository update timed out")]
#[case(UserPersistenceError::corruption("id 0"), ErrorCode::StorageCorruption, "user row is corrupt: id 0")]
#[case(UserPersistenceError::query("syntax"), ErrorCode::InternalError, "user repository error: syntax")]
#[tokio::test]
async fn update_maps_persistence_errors(
    #[case] failure: UserPersistenceError,
    #[case] code: ErrorCode,
    #[case] message: &str,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_update()
        .times(1)
        .return_once(move |_, _| Err(failure));

    let error = make_service(repo)
        .update_user(UserId::new(9).expect("valid id"), ada_draft())
        .await
        .expect_err("store failure");
    assert_eq!(error.code(), code);
    assert_eq!(error.message(), message);
}

#[tokio::test]
async fn update_passes_identifier_through() {
    let mut repo = MockUserRepository::new();
    repo.expect_update()
        .withf(|id, fields| id.get() == 3 && fields.last_name() == "Lovelace")
        .times(1)
        .return_once(|_, _| Ok(ada(3)));

    let user = make_service(repo)
        .update_user(UserId::new(3).expect("valid id"), ada_draft())
        .await
        .expect("update succeeds");
    assert_eq!(user.id().get(), 3);
}

#[rstest]
#[case(None, None)]
#[case(Some(String::new()), None)]
#[case(Some("Love".to_owned()), Some("Love".to_owned()))]
#[tokio::test]
async fn search_treats_empty_name_as_absent(
    #[case] name: Option<String>,
    #[case] expected: Option<String>,
) {
    let mut repo = MockUserRepository::new();
    repo.expect_search()
        .withf(move |fragment| *fragment == expected)
        .times(1)
        .return_once(|_| Ok(vec![ada(1)]));

    let users = make_service(repo)
        .search_users(name)
        .await
        .expect("search succeeds");
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn find_reports_missing_user_as_not_found() {
    let mut repo = MockUserRepository::new();
    repo.expect_find().times(1).return_once(|_| Ok(None));

    let error = make_service(repo)
        .find_user(UserLookup::Username("nobody".to_owned()))
        .await
        .expect_err("missing user");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "user not found");
}

#[tokio::test]
async fn find_returns_matching_user() {
    let mut repo = MockUserRepository::new();
    repo.expect_find()
        .withf(|lookup| *lookup == UserLookup::Id(UserId::new(1).expect("valid id")))
        .times(1)
        .return_once(|_| Ok(Some(ada(1))));

    let user = make_service(repo)
        .find_user(UserLookup::parse("1"))
        .await
        .expect("user found");
    assert_eq!(user.username(), "ada1");
}

#[tokio::test]
async fn numeric_identifier_falls_back_to_username() {
    let mut repo = MockUserRepository::new();
    repo.expect_find()
        .withf(|lookup| *lookup == UserLookup::Id(UserId::new(1234).expect("valid id")))
        .times(1)
        .return_once(|_| Ok(None));
    repo.expect_find()
        .withf(|lookup| *lookup == UserLookup::Username("1234".to_owned()))
        .times(1)
        .return_once(|_| Ok(Some(ada(7))));

    let user = make_service(repo)
        .find_user(UserLookup::parse("1234"))
        .await
        .expect("numeric username found");
    assert_eq!(user.id().get(), 7);
}
