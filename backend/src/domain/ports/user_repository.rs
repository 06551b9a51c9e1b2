//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{User, UserFields, UserId, UserLookup};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another row already holds the username.
        DuplicateUsername { username: String } => "username {username} is already taken",
        /// No row matched the identifier of an update.
        NotFound { id: i64 } => "user {id} does not exist",
        /// A stored row could not be mapped back into a user.
        Corruption { message: String } => "user row is corrupt: {message}",
        /// The operation did not complete within the configured deadline.
        Timeout { operation: String } => "user repository {operation} timed out",
    }
}

/// Driven port for storing and reading user rows.
///
/// `create` and `update` check username uniqueness and write within a single
/// transaction, so two concurrent writers cannot both claim a username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new row, returning it with the store-assigned identifier.
    async fn create(&self, fields: &UserFields) -> Result<User, UserPersistenceError>;

    /// Overwrite every field of the row identified by `id`.
    ///
    /// Keeping the row's own username is not a conflict.
    async fn update(&self, id: UserId, fields: &UserFields) -> Result<User, UserPersistenceError>;

    /// Users whose first or last name contains `name_fragment`.
    ///
    /// `None` returns every user ordered by date of birth.
    async fn search(&self, name_fragment: Option<String>)
    -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch a single user by identifier or username.
    async fn find(&self, lookup: &UserLookup) -> Result<Option<User>, UserPersistenceError>;
}
