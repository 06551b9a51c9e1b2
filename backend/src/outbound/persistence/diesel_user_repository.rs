//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Writes run the username check and the write in one transaction. The
//! `users_username_key` constraint still decides races between concurrent
//! writers; its violation maps to the same duplicate-username error as the
//! check.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserFields, UserId, UserLookup};

use super::models::{UserRow, UserWrite};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Default upper bound on a single repository operation.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    query_timeout: Duration,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    /// ```no_run
    /// use std::time::Duration;
    /// use users_service::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/users")).await?;
    /// let repo = DieselUserRepository::new(pool).with_query_timeout(Duration::from_secs(2));
    /// # let _ = repo;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Bound every operation, including pool checkout, by `timeout`.
    #[must_use]
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    async fn bounded<T, F>(&self, operation: &'static str, work: F) -> Result<T, UserPersistenceError>
    where
        F: Future<Output = Result<T, UserPersistenceError>>,
    {
        match tokio::time::timeout(self.query_timeout, work).await {
            Ok(result) => result,
            Err(_) => {
                debug!(
                    operation,
                    timeout_ms = u64::try_from(self.query_timeout.as_millis()).unwrap_or(u64::MAX),
                    "user repository operation timed out"
                );
                Err(UserPersistenceError::timeout(operation))
            }
        }
    }
}

/// Outcome of a transactional write.
enum WriteOutcome {
    Written(UserRow),
    UsernameTaken,
    Missing,
}

/// Map pool errors to domain user persistence errors.
fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

/// Map Diesel errors to domain user persistence errors.
fn map_diesel_error(error: DieselError) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::DeserializationError(err) => {
            UserPersistenceError::corruption(format!("row could not be decoded: {err}"))
        }
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Map errors raised by a write, which may trip the username constraint.
fn map_write_error(error: DieselError, username: &str) -> UserPersistenceError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            debug!(
                constraint = info.constraint_name(),
                "username constraint rejected write"
            );
            UserPersistenceError::duplicate_username(username)
        }
        other => map_diesel_error(other),
    }
}

/// Convert a database row to a domain user.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let UserRow {
        id,
        first_name,
        last_name,
        username,
        date_of_birth,
    } = row;
    let id = UserId::new(i64::from(id))
        .map_err(|err| UserPersistenceError::corruption(err.to_string()))?;
    Ok(User::new(
        id,
        UserFields::from_trusted_parts(first_name, last_name, username, date_of_birth),
    ))
}

fn rows_to_users(rows: Vec<UserRow>) -> Result<Vec<User>, UserPersistenceError> {
    rows.into_iter().map(row_to_user).collect()
}

/// Escape LIKE metacharacters so `fragment` matches literally.
fn like_pattern(fragment: &str) -> String {
    let mut pattern = String::with_capacity(fragment.len() + 2);
    pattern.push('%');
    for ch in fragment.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Whether a user other than `excluding` already holds `username`.
///
/// Identifiers start at one, so excluding `0` checks every row.
async fn username_taken<C>(conn: &mut C, username: &str, excluding: i32) -> Result<bool, DieselError>
where
    C: AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    diesel::select(diesel::dsl::exists(
        users::table
            .filter(users::username.eq(username))
            .filter(users::id.ne(excluding)),
    ))
    .get_result(conn)
    .await
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, fields: &UserFields) -> Result<User, UserPersistenceError> {
        let username = fields.username();
        let row = UserWrite::from(fields);
        let outcome = self
            .bounded("create", async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                conn.transaction::<_, DieselError, _>(|conn| {
                    async move {
                        if username_taken(conn, username, 0).await? {
                            return Ok(WriteOutcome::UsernameTaken);
                        }
                        let inserted = diesel::insert_into(users::table)
                            .values(&row)
                            .returning(UserRow::as_returning())
                            .get_result(conn)
                            .await?;
                        Ok(WriteOutcome::Written(inserted))
                    }
                    .scope_boxed()
                })
                .await
                .map_err(|err| map_write_error(err, username))
            })
            .await?;

        match outcome {
            WriteOutcome::Written(inserted) => row_to_user(inserted),
            WriteOutcome::UsernameTaken | WriteOutcome::Missing => {
                Err(UserPersistenceError::duplicate_username(username))
            }
        }
    }

    async fn update(&self, id: UserId, fields: &UserFields) -> Result<User, UserPersistenceError> {
        let username = fields.username();
        let changes = UserWrite::from(fields);
        let key = id.get();
        let outcome = self
            .bounded("update", async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                conn.transaction::<_, DieselError, _>(|conn| {
                    async move {
                        if username_taken(conn, username, key).await? {
                            return Ok(WriteOutcome::UsernameTaken);
                        }
                        let updated = diesel::update(users::table.find(key))
                            .set(&changes)
                            .returning(UserRow::as_returning())
                            .get_result(conn)
                            .await
                            .optional()?;
                        Ok(updated.map_or(WriteOutcome::Missing, WriteOutcome::Written))
                    }
                    .scope_boxed()
                })
                .await
                .map_err(|err| map_write_error(err, username))
            })
            .await?;

        match outcome {
            WriteOutcome::Written(updated) => row_to_user(updated),
            WriteOutcome::UsernameTaken => Err(UserPersistenceError::duplicate_username(username)),
            WriteOutcome::Missing => Err(UserPersistenceError::not_found(i64::from(key))),
        }
    }

    async fn search(
        &self,
        name_fragment: Option<String>,
    ) -> Result<Vec<User>, UserPersistenceError> {
        let rows = self
            .bounded("search", async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let query = users::table.select(UserRow::as_select()).into_boxed();
                let query = match name_fragment.as_deref() {
                    Some(fragment) if !fragment.is_empty() => {
                        let pattern = like_pattern(fragment);
                        query
                            .filter(
                                users::first_name
                                    .like(pattern.clone())
                                    .escape('\\')
                                    .or(users::last_name.like(pattern).escape('\\')),
                            )
                            .order(users::id.asc())
                    }
                    _ => query.order((users::date_of_birth.asc(), users::id.asc())),
                };
                query.load(&mut conn).await.map_err(map_diesel_error)
            })
            .await?;

        rows_to_users(rows)
    }

    async fn find(&self, lookup: &UserLookup) -> Result<Option<User>, UserPersistenceError> {
        let row = self
            .bounded("find", async {
                let mut conn = self.pool.get().await.map_err(map_pool_error)?;
                let query = users::table.select(UserRow::as_select()).into_boxed();
                let query = match lookup {
                    UserLookup::Id(id) => query.filter(users::id.eq(id.get())),
                    UserLookup::Username(username) => {
                        query.filter(users::username.eq(username.as_str()))
                    }
                };
                query
                    .first(&mut conn)
                    .await
                    .optional()
                    .map_err(map_diesel_error)
            })
            .await?;

        row.map(row_to_user).transpose()
    }
}
