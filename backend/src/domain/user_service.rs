//! User domain service.
//!
//! Implements the driving ports by running the validation rules and then the
//! repository, translating both failure families into domain [`Error`]s.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{
    Error, User, UserDraft, UserFields, UserId, UserLookup, UserValidationError, UserValidator,
};

/// Message returned when a username is already held by another user.
pub const DUPLICATE_USERNAME_MESSAGE: &str = "Username already exists";
/// Message returned when the addressed user does not exist.
pub const USER_NOT_FOUND_MESSAGE: &str = "user not found";

/// User service implementing [`UsersCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct UserService<R> {
    repository: Arc<R>,
    validator: UserValidator,
}

impl<R> UserService<R> {
    /// Create a new service over `repository`, validating with `validator`.
    pub fn new(repository: Arc<R>, validator: UserValidator) -> Self {
        Self {
            repository,
            validator,
        }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    fn validate(&self, operation: &'static str, draft: &UserDraft) -> Result<UserFields, Error> {
        self.validator.validate(draft).map_err(|err| {
            debug!(
                operation,
                field = err.field().as_str(),
                rule = err.code(),
                "user draft rejected"
            );
            map_validation_error(&err)
        })
    }

    async fn find_one(&self, lookup: &UserLookup) -> Result<Option<User>, Error> {
        self.repository
            .find(lookup)
            .await
            .map_err(map_persistence_error)
    }
}

fn map_validation_error(error: &UserValidationError) -> Error {
    let details = json!({
        "field": error.field().as_str(),
        "code": error.code(),
    });
    if error.is_parse_error() {
        Error::malformed_request(error.to_string()).with_details(details)
    } else {
        Error::validation_failed(error.to_string()).with_details(details)
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateUsername { username } => {
            Error::duplicate_username(DUPLICATE_USERNAME_MESSAGE)
                .with_details(json!({ "username": username }))
        }
        UserPersistenceError::NotFound { id } => {
            Error::not_found(USER_NOT_FOUND_MESSAGE).with_details(json!({ "id": id }))
        }
        UserPersistenceError::Connection { message } => {
            Error::storage_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Timeout { operation } => {
            Error::storage_unavailable(format!("user repository {operation} timed out"))
        }
        UserPersistenceError::Corruption { message } => {
            Error::storage_corruption(format!("user row is corrupt: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let fields = self.validate("create_user", &draft)?;
        let user = self
            .repository
            .create(&fields)
            .await
            .map_err(map_persistence_error)?;
        debug!(id = user.id().get(), "user created");
        Ok(user)
    }

    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<User, Error> {
        let fields = self.validate("update_user", &draft)?;
        let user = self
            .repository
            .update(id, &fields)
            .await
            .map_err(map_persistence_error)?;
        debug!(id = user.id().get(), "user updated");
        Ok(user)
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn search_users(&self, name: Option<String>) -> Result<Vec<User>, Error> {
        let fragment = name.filter(|value| !value.is_empty());
        self.repository
            .search(fragment)
            .await
            .map_err(map_persistence_error)
    }

    async fn find_user(&self, lookup: UserLookup) -> Result<User, Error> {
        if let Some(user) = self.find_one(&lookup).await? {
            return Ok(user);
        }
        // A numeric segment may also be a username.
        if let UserLookup::Id(id) = &lookup {
            let by_username = UserLookup::Username(id.to_string());
            if let Some(user) = self.find_one(&by_username).await? {
                return Ok(user);
            }
        }
        debug!(%lookup, "user lookup missed");
        Err(Error::not_found(USER_NOT_FOUND_MESSAGE))
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
