//! Request body shapes and presence checks for inbound HTTP adapters.
//!
//! Bodies deserialise into [`UserRequest`], whose fields are all optional so
//! that an absent or `null` field is reported by name instead of as a serde
//! failure. A field holding a non-string value still fails deserialisation
//! and is reported through the JSON extractor error handler.

use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, UserDraft};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

const FIRST_NAME: FieldName = FieldName::new("first_name");
const LAST_NAME: FieldName = FieldName::new("last_name");
const USERNAME: FieldName = FieldName::new("username");
const DATE_OF_BIRTH: FieldName = FieldName::new("date_of_birth");

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::malformed_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

fn require(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Candidate user body for `POST /users/create` and `PUT /users/update/{id}`.
///
/// Example JSON:
/// `{"first_name":"Ada","last_name":"Lovelace","username":"ada1","date_of_birth":"1905-12-10"}`
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UserRequest {
    /// Given name; letters only, 2 to 50 characters.
    #[schema(example = "Ada")]
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name; letters only, 2 to 50 characters.
    #[schema(example = "Lovelace")]
    #[serde(default)]
    pub last_name: Option<String>,
    /// Unique handle; letters or digits, 3 to 16 characters.
    #[schema(example = "ada1")]
    #[serde(default)]
    pub username: Option<String>,
    /// Calendar date in `YYYY-MM-DD` form.
    #[schema(example = "1905-12-10", format = Date)]
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

impl TryFrom<UserRequest> for UserDraft {
    type Error = Error;

    /// Require every field, checking the date of birth first.
    fn try_from(value: UserRequest) -> Result<Self, Self::Error> {
        let UserRequest {
            first_name,
            last_name,
            username,
            date_of_birth,
        } = value;
        let date_of_birth = require(date_of_birth, DATE_OF_BIRTH)?;
        let first_name = require(first_name, FIRST_NAME)?;
        let last_name = require(last_name, LAST_NAME)?;
        let username = require(username, USERNAME)?;
        Ok(UserDraft::new(first_name, last_name, username, date_of_birth))
    }
}
