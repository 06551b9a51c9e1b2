//! Driving port for user mutations.
//!
//! HTTP handlers call this port with unvalidated client input; the
//! implementation validates it, enforces username uniqueness and persists the
//! result.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft, UserId};

/// Domain use-case port for creating and updating users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate `draft` and store it as a new user.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the draft breaks a validation rule;
    /// - another user already holds the username;
    /// - the store fails.
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Validate `draft` and overwrite the user identified by `id`.
    ///
    /// # Errors
    ///
    /// As for [`UsersCommand::create_user`], plus a not-found error when no
    /// user has `id`.
    async fn update_user(&self, id: UserId, draft: UserDraft) -> Result<User, Error>;
}
