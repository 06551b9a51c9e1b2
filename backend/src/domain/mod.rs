//! Domain primitives, rules and services.
//!
//! Purpose: define the user record, the rules a candidate record must satisfy
//! and the service that applies them before touching storage. Types here are
//! transport agnostic; HTTP and SQL concerns live in the adapters.
//!
//! Public surface:
//! - Error / ErrorCode: domain error payload and its stable category.
//! - User, UserId, UserDraft, UserFields, UserLookup: the user model.
//! - validate_user / UserValidator: the field rules.
//! - UserService: implementation of the driving ports.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;
pub mod user_validation;

pub use self::error::{Error, ErrorCode};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{User, UserDraft, UserFields, UserId, UserIdError, UserLookup};
pub use self::user_service::UserService;
pub use self::user_validation::{UserField, UserValidationError, UserValidator, validate_user};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use users_service::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<u32> {
///     Err(Error::not_found("user not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
