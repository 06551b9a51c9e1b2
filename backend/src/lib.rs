//! Users service library.
//!
//! Layout follows a ports-and-adapters split:
//!
//! - [`domain`]: the user model, validation rules and the service
//!   implementing the driving ports.
//! - [`inbound`]: the Actix HTTP adapter.
//! - [`outbound`]: the Diesel PostgreSQL adapter.
//! - [`middleware`]: request tracing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
