//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserFields, UserId, UserLookup};

/// Clock frozen at a single instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock(DateTime<Utc>);

impl FixtureClock {
    /// Freeze the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }

    /// Freeze the clock at noon UTC on the given calendar day.
    ///
    /// # Panics
    /// Panics when the date does not exist.
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        match Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).single() {
            Some(now) => Self(now),
            None => panic!("fixture clock date {year}-{month}-{day} does not exist"),
        }
    }
}

impl Default for FixtureClock {
    fn default() -> Self {
        Self::on(2024, 6, 1)
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<User>,
    last_id: i64,
}

impl Table {
    fn username_taken(&self, username: &str, excluding: Option<UserId>) -> bool {
        self.rows
            .iter()
            .any(|user| user.username() == username && Some(user.id()) != excluding)
    }
}

/// In-memory [`UserRepository`] with the same observable behaviour as the
/// SQL adapter: sequential identifiers, username uniqueness, substring search
/// ordered by id, and the full listing ordered by date of birth.
///
/// # Examples
/// ```
/// use users_service::domain::ports::UserRepository;
/// use users_service::domain::UserLookup;
/// use users_service::test_support::InMemoryUserRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = InMemoryUserRepository::default();
/// let found = repo
///     .find(&UserLookup::Username("ada1".into()))
///     .await
///     .expect("lookup succeeds");
/// assert!(found.is_none());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: Mutex<Table>,
}

impl InMemoryUserRepository {
    fn lock(&self) -> Result<MutexGuard<'_, Table>, UserPersistenceError> {
        self.table
            .lock()
            .map_err(|_| UserPersistenceError::connection("in-memory user table is poisoned"))
    }

    /// Number of stored users.
    pub fn len(&self) -> usize {
        self.lock().map(|table| table.rows.len()).unwrap_or_default()
    }

    /// Whether no users are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, fields: &UserFields) -> Result<User, UserPersistenceError> {
        let mut table = self.lock()?;
        if table.username_taken(fields.username(), None) {
            return Err(UserPersistenceError::duplicate_username(fields.username()));
        }
        let next = table.last_id + 1;
        let id = UserId::new(next)
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        table.last_id = next;
        let user = User::new(id, fields.clone());
        table.rows.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, fields: &UserFields) -> Result<User, UserPersistenceError> {
        let mut table = self.lock()?;
        if table.username_taken(fields.username(), Some(id)) {
            return Err(UserPersistenceError::duplicate_username(fields.username()));
        }
        let Some(row) = table.rows.iter_mut().find(|user| user.id() == id) else {
            return Err(UserPersistenceError::not_found(i64::from(id)));
        };
        *row = User::new(id, fields.clone());
        Ok(row.clone())
    }

    async fn search(
        &self,
        name_fragment: Option<String>,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let table = self.lock()?;
        let mut users: Vec<User> = match name_fragment.as_deref() {
            Some(fragment) => table
                .rows
                .iter()
                .filter(|user| {
                    user.first_name().contains(fragment) || user.last_name().contains(fragment)
                })
                .cloned()
                .collect(),
            None => table.rows.clone(),
        };
        match name_fragment {
            Some(_) => users.sort_by_key(User::id),
            None => users.sort_by_key(|user| (user.date_of_birth(), user.id())),
        }
        Ok(users)
    }

    async fn find(&self, lookup: &UserLookup) -> Result<Option<User>, UserPersistenceError> {
        let table = self.lock()?;
        let found = table.rows.iter().find(|user| match lookup {
            UserLookup::Id(id) => user.id() == *id,
            UserLookup::Username(username) => user.username() == username,
        });
        Ok(found.cloned())
    }
}
