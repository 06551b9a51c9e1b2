//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into `{"error": message}` bodies with
//! consistent status codes. Extractor failures are routed through the same
//! envelope by the `*_error_handler` functions registered in
//! [`configure_extractors`].

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

/// Client-visible message for every server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
/// Client-visible message for unparseable request bodies and queries.
pub const BAD_REQUEST_MESSAGE: &str = "Bad request";
/// Client-visible message for path identifiers that are not positive integers.
pub const INVALID_USER_ID_MESSAGE: &str = "Invalid user ID";

/// JSON error envelope returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Terse description of the failure.
    #[schema(example = "Username already exists")]
    pub error: String,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::MalformedRequest | ErrorCode::ValidationFailed | ErrorCode::InvalidIdentifier => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::DuplicateUsername => StatusCode::CONFLICT,
        ErrorCode::StorageUnavailable | ErrorCode::StorageCorruption | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn client_message(error: &Error) -> &str {
    if error.code().is_internal() {
        INTERNAL_ERROR_MESSAGE
    } else {
        error.message()
    }
}

fn log_error(error: &Error) {
    let trace_id = error.trace_id().unwrap_or_default();
    let details = error.details().map(ToString::to_string).unwrap_or_default();
    if error.code().is_internal() {
        error!(
            code = %error.code(),
            message = error.message(),
            %details,
            trace_id,
            "request failed"
        );
    } else {
        debug!(
            code = %error.code(),
            message = error.message(),
            %details,
            trace_id,
            "request rejected"
        );
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        log_error(self);
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }

        builder.json(ErrorBody {
            error: client_message(self).to_owned(),
        })
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(INTERNAL_ERROR_MESSAGE)
    }
}

/// Turn JSON body extraction failures into the error envelope.
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "request body rejected");
    Error::malformed_request(BAD_REQUEST_MESSAGE).into()
}

/// Turn path extraction failures into an invalid-identifier error.
pub fn path_error_handler(err: PathError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "path identifier rejected");
    Error::invalid_identifier(INVALID_USER_ID_MESSAGE).into()
}

/// Turn query string extraction failures into the error envelope.
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "query string rejected");
    Error::malformed_request(BAD_REQUEST_MESSAGE).into()
}

/// Register the extractor error handlers on an app or scope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_service::inbound::http::error::configure_extractors;
///
/// let _app = App::new().configure(configure_extractors);
/// ```
pub fn configure_extractors(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler));
}
