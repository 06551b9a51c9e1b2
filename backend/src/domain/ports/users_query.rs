//! Driving port for user-facing queries.
//!
//! Inbound adapters use this port to read users without importing outbound
//! persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, User, UserLookup};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Users whose first or last name contains `name`, or every user when
    /// `name` is absent or empty.
    async fn search_users(&self, name: Option<String>) -> Result<Vec<User>, Error>;

    /// A single user addressed by identifier or username.
    async fn find_user(&self, lookup: UserLookup) -> Result<User, Error>;
}
