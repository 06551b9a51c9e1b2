//! Field-level rules for candidate user records.
//!
//! Rules run in a fixed order and the first failure is reported:
//!
//! 1. names and username are non-blank;
//! 2. the date of birth parses as `YYYY-MM-DD`;
//! 3. the date of birth is not in the future;
//! 4. the date of birth is not before 1900-01-01;
//! 5. lengths: names 2–50, username 3–16 characters;
//! 6. the username is letters or digits only;
//! 7. names are letters only.

use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use mockable::Clock;
use regex::Regex;

use super::{UserDraft, UserFields};

/// Minimum length of first and last names, in characters.
pub const NAME_MIN: usize = 2;
/// Maximum length of first and last names, in characters.
pub const NAME_MAX: usize = 50;
/// Minimum username length, in characters.
pub const USERNAME_MIN: usize = 3;
/// Maximum username length, in characters.
pub const USERNAME_MAX: usize = 16;

/// Format accepted for dates of birth.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which user field a rule concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    FirstName,
    LastName,
    Username,
    DateOfBirth,
}

impl UserField {
    /// Wire name of the field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Username => "username",
            Self::DateOfBirth => "date_of_birth",
        }
    }
}

/// Rule violations, one variant per rule and field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("first name cannot be blank")]
    BlankFirstName,
    #[error("last name cannot be blank")]
    BlankLastName,
    #[error("username cannot be blank")]
    BlankUsername,
    #[error("Invalid date format")]
    MalformedDateOfBirth,
    #[error("date of birth cannot be in the future")]
    DateOfBirthInFuture,
    #[error("date of birth cannot be before January 1, 1900")]
    DateOfBirthTooEarly,
    #[error("first name must be between {min} and {max} characters")]
    FirstNameLength { min: usize, max: usize },
    #[error("last name must be between {min} and {max} characters")]
    LastNameLength { min: usize, max: usize },
    #[error("username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },
    #[error("username must be alphanumeric")]
    UsernameNotAlphanumeric,
    #[error("first name must contain only letters")]
    FirstNameNotLetters,
    #[error("last name must contain only letters")]
    LastNameNotLetters,
}

impl UserValidationError {
    /// The field the violated rule applies to.
    #[must_use]
    pub fn field(&self) -> UserField {
        match self {
            Self::BlankFirstName | Self::FirstNameLength { .. } | Self::FirstNameNotLetters => {
                UserField::FirstName
            }
            Self::BlankLastName | Self::LastNameLength { .. } | Self::LastNameNotLetters => {
                UserField::LastName
            }
            Self::BlankUsername | Self::UsernameLength { .. } | Self::UsernameNotAlphanumeric => {
                UserField::Username
            }
            Self::MalformedDateOfBirth | Self::DateOfBirthInFuture | Self::DateOfBirthTooEarly => {
                UserField::DateOfBirth
            }
        }
    }

    /// Stable code naming the violated rule.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::BlankFirstName | Self::BlankLastName | Self::BlankUsername => "blank",
            Self::MalformedDateOfBirth => "malformed_date",
            Self::DateOfBirthInFuture => "date_in_future",
            Self::DateOfBirthTooEarly => "date_too_early",
            Self::FirstNameLength { .. }
            | Self::LastNameLength { .. }
            | Self::UsernameLength { .. } => "length",
            Self::UsernameNotAlphanumeric => "not_alphanumeric",
            Self::FirstNameNotLetters | Self::LastNameNotLetters => "not_letters",
        }
    }

    /// Whether the failure is a parse-level problem rather than a rule
    /// violation on a well-formed value.
    #[must_use]
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::MalformedDateOfBirth)
    }
}

static DATE_RE: OnceLock<Regex> = OnceLock::new();
static LETTERS_RE: OnceLock<Regex> = OnceLock::new();
static ALPHANUMERIC_RE: OnceLock<Regex> = OnceLock::new();

fn compile(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| {
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("validation regex {pattern} failed to compile: {error}"))
    })
}

fn date_regex() -> &'static Regex {
    compile(&DATE_RE, "^[0-9]{4}-[0-9]{2}-[0-9]{2}$")
}

fn letters_regex() -> &'static Regex {
    compile(&LETTERS_RE, r"^\p{L}+$")
}

fn alphanumeric_regex() -> &'static Regex {
    compile(&ALPHANUMERIC_RE, r"^[\p{L}\p{Nd}]+$")
}

/// Earliest accepted date of birth.
#[must_use]
pub fn earliest_date_of_birth() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date_of_birth(raw: &str) -> Result<NaiveDate, UserValidationError> {
    if !date_regex().is_match(raw) {
        return Err(UserValidationError::MalformedDateOfBirth);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| UserValidationError::MalformedDateOfBirth)
}

fn length_within(value: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&value.chars().count())
}

/// Check `draft` against every rule, using `today` as the current date.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use users_service::domain::{validate_user, UserDraft, UserValidationError};
///
/// let today = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");
/// let fields = validate_user(&UserDraft::new("Ada", "Lovelace", "ada1", "1905-12-10"), today)
///     .expect("valid draft");
/// assert_eq!(fields.username(), "ada1");
///
/// let err = validate_user(&UserDraft::new("Ada", "Lovelace", "a", "1905-12-10"), today)
///     .expect_err("username too short");
/// assert!(matches!(err, UserValidationError::UsernameLength { .. }));
/// ```
pub fn validate_user(draft: &UserDraft, today: NaiveDate) -> Result<UserFields, UserValidationError> {
    let first_name = draft.first_name().trim();
    let last_name = draft.last_name().trim();
    let username = draft.username().trim();

    if first_name.is_empty() {
        return Err(UserValidationError::BlankFirstName);
    }
    if last_name.is_empty() {
        return Err(UserValidationError::BlankLastName);
    }
    if username.is_empty() {
        return Err(UserValidationError::BlankUsername);
    }

    let date_of_birth = parse_date_of_birth(draft.date_of_birth())?;
    if date_of_birth > today {
        return Err(UserValidationError::DateOfBirthInFuture);
    }
    if date_of_birth < earliest_date_of_birth() {
        return Err(UserValidationError::DateOfBirthTooEarly);
    }

    if !length_within(first_name, NAME_MIN, NAME_MAX) {
        return Err(UserValidationError::FirstNameLength {
            min: NAME_MIN,
            max: NAME_MAX,
        });
    }
    if !length_within(last_name, NAME_MIN, NAME_MAX) {
        return Err(UserValidationError::LastNameLength {
            min: NAME_MIN,
            max: NAME_MAX,
        });
    }
    if !length_within(username, USERNAME_MIN, USERNAME_MAX) {
        return Err(UserValidationError::UsernameLength {
            min: USERNAME_MIN,
            max: USERNAME_MAX,
        });
    }

    if !alphanumeric_regex().is_match(username) {
        return Err(UserValidationError::UsernameNotAlphanumeric);
    }
    if !letters_regex().is_match(first_name) {
        return Err(UserValidationError::FirstNameNotLetters);
    }
    if !letters_regex().is_match(last_name) {
        return Err(UserValidationError::LastNameNotLetters);
    }

    Ok(UserFields::from_trusted_parts(
        first_name.to_owned(),
        last_name.to_owned(),
        username.to_owned(),
        date_of_birth,
    ))
}

/// Validator bound to a clock, so "today" comes from an injectable source.
#[derive(Clone)]
pub struct UserValidator {
    clock: Arc<dyn Clock>,
}

impl UserValidator {
    /// Create a validator reading the current date from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Validate `draft` against today's date in UTC.
    pub fn validate(&self, draft: &UserDraft) -> Result<UserFields, UserValidationError> {
        validate_user(draft, self.clock.utc().date_naive())
    }
}

#[cfg(test)]
mod tests;
