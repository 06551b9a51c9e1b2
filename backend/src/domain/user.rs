//! User data model.
//!
//! A [`UserDraft`] is the candidate record supplied by a client. It becomes a
//! [`UserFields`] once the rules in [`crate::domain::user_validation`] pass,
//! and a [`User`] once the store has assigned an identifier.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Errors raised when constructing a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// Store-assigned identifiers start at one.
    #[error("user id must be a positive integer, got {0}")]
    NotPositive(i64),
}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UserId(i32);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use users_service::domain::UserId;
    ///
    /// assert_eq!(UserId::new(7).map(|id| id.get()), Ok(7));
    /// assert!(UserId::new(0).is_err());
    /// ```
    pub fn new(id: i64) -> Result<Self, UserIdError> {
        match i32::try_from(id) {
            Ok(value) if value > 0 => Ok(Self(value)),
            _ => Err(UserIdError::NotPositive(id)),
        }
    }

    /// Raw integer value.
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for UserId {
    type Error = UserIdError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for i64 {
    fn from(value: UserId) -> Self {
        i64::from(value.0)
    }
}

/// Candidate user record, prior to validation.
///
/// Name fields are trimmed of surrounding whitespace on construction. The
/// date of birth is kept verbatim; parsing it is the validator's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    first_name: String,
    last_name: String,
    username: String,
    date_of_birth: String,
}

impl UserDraft {
    /// Build a draft from raw client input.
    pub fn new(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
        username: impl AsRef<str>,
        date_of_birth: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.as_ref().trim().to_owned(),
            last_name: last_name.as_ref().trim().to_owned(),
            username: username.as_ref().trim().to_owned(),
            date_of_birth: date_of_birth.into(),
        }
    }

    /// Trimmed first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Trimmed last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Trimmed username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Date of birth as supplied.
    #[must_use]
    pub fn date_of_birth(&self) -> &str {
        &self.date_of_birth
    }
}

/// A field set that has passed validation.
///
/// ## Invariants
/// - Names are 2–50 letters; the username is 3–16 letters or digits.
/// - `date_of_birth` lies between 1900-01-01 and the validation date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields {
    first_name: String,
    last_name: String,
    username: String,
    date_of_birth: NaiveDate,
}

impl UserFields {
    /// Assemble fields that are already known to be valid, either because the
    /// validator produced them or because they were read back from the store.
    pub(crate) fn from_trusted_parts(
        first_name: String,
        last_name: String,
        username: String,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            first_name,
            last_name,
            username,
            date_of_birth,
        }
    }

    /// First name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Username, unique across all users.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Calendar date of birth.
    #[must_use]
    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }
}

/// Stored user record.
///
/// Serialises as
/// `{"id", "first_name", "last_name", "username", "date_of_birth"}` with the
/// date rendered `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    id: UserId,
    fields: UserFields,
}

impl User {
    /// Pair a store-assigned identifier with validated fields.
    #[must_use]
    pub fn new(id: UserId, fields: UserFields) -> Self {
        Self { id, fields }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// The user's field values.
    #[must_use]
    pub fn fields(&self) -> &UserFields {
        &self.fields
    }

    /// First name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.fields.first_name()
    }

    /// Last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.fields.last_name()
    }

    /// Username.
    #[must_use]
    pub fn username(&self) -> &str {
        self.fields.username()
    }

    /// Date of birth.
    #[must_use]
    pub fn date_of_birth(&self) -> NaiveDate {
        self.fields.date_of_birth()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDto {
    id: i64,
    first_name: String,
    last_name: String,
    username: String,
    date_of_birth: NaiveDate,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User { id, fields } = value;
        Self {
            id: id.into(),
            first_name: fields.first_name,
            last_name: fields.last_name,
            username: fields.username,
            date_of_birth: fields.date_of_birth,
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserIdError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let id = UserId::new(value.id)?;
        Ok(Self::new(
            id,
            UserFields::from_trusted_parts(
                value.first_name,
                value.last_name,
                value.username,
                value.date_of_birth,
            ),
        ))
    }
}

/// How a single user is addressed: by identifier or by exact username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserLookup {
    /// Match on the store-assigned identifier.
    Id(UserId),
    /// Match on the username.
    Username(String),
}

impl UserLookup {
    /// Interpret a path segment: canonical positive integers address an id,
    /// anything else a username. Numeric usernames stay reachable through
    /// the username fallback in [`crate::domain::UserService`].
    ///
    /// # Examples
    /// ```
    /// use users_service::domain::{UserId, UserLookup};
    ///
    /// assert_eq!(
    ///     UserLookup::parse("42"),
    ///     UserLookup::Id(UserId::new(42).expect("valid id"))
    /// );
    /// assert_eq!(UserLookup::parse("ada1"), UserLookup::Username("ada1".into()));
    /// ```
    #[must_use]
    pub fn parse(identifier: &str) -> Self {
        let trimmed = identifier.trim();
        match trimmed.parse::<i64>().ok().and_then(|raw| UserId::new(raw).ok()) {
            Some(id) if id.to_string() == trimmed => Self::Id(id),
            _ => Self::Username(trimmed.to_owned()),
        }
    }
}

impl fmt::Display for UserLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Username(username) => write!(f, "username {username}"),
        }
    }
}
