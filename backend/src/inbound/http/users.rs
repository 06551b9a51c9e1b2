//! Users API handlers.
//!
//! ```text
//! POST /users/create {"first_name":"Ada","last_name":"Lovelace","username":"ada1","date_of_birth":"1905-12-10"}
//! PUT /users/update/1 {"first_name":"Ada","last_name":"King","username":"ada1","date_of_birth":"1905-12-10"}
//! GET /users/search?name=Love
//! GET /users/1
//! GET /users/ada1
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

use crate::domain::{Error, User, UserDraft, UserId, UserLookup};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{ErrorBody, INVALID_USER_ID_MESSAGE};
use crate::inbound::http::schemas::UserSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::UserRequest;

/// Query string for `GET /users/search`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring matched against first and last names; omit to list everyone.
    pub name: Option<String>,
}

fn parse_user_id(raw: i64) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| {
        debug!(error = %err, "user id rejected");
        Error::invalid_identifier(INVALID_USER_ID_MESSAGE)
    })
}

/// Create a user.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_service::inbound::http::users::create_user;
///
/// let app = App::new().service(create_user);
/// ```
#[utoipa::path(
    post,
    path = "/users/create",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Malformed or invalid user", body = ErrorBody),
        (status = 409, description = "Username already exists", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users/create")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserRequest>,
) -> ApiResult<HttpResponse> {
    let draft = UserDraft::try_from(payload.into_inner())?;
    let user = state.users_command.create_user(draft).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Replace every field of an existing user.
#[utoipa::path(
    put,
    path = "/users/update/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = UserSchema),
        (status = 400, description = "Malformed or invalid user, or bad identifier", body = ErrorBody),
        (status = 404, description = "No user has this identifier", body = ErrorBody),
        (status = 409, description = "Username already exists", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/update/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<UserRequest>,
) -> ApiResult<web::Json<User>> {
    let id = parse_user_id(path.into_inner())?;
    let draft = UserDraft::try_from(payload.into_inner())?;
    let user = state.users_command.update_user(id, draft).await?;
    Ok(web::Json(user))
}

/// Search users by name fragment.
///
/// With `name`, returns users whose first or last name contains it, by id.
/// Without it, returns every user ordered by date of birth.
#[utoipa::path(
    get,
    path = "/users/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching users", body = [UserSchema]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "searchUsers"
)]
#[get("/users/search")]
pub async fn search_users(
    state: web::Data<HttpState>,
    query: web::Query<SearchQuery>,
) -> ApiResult<web::Json<Vec<User>>> {
    let SearchQuery { name } = query.into_inner();
    let users = state.users_query.search_users(name).await?;
    Ok(web::Json(users))
}

/// Fetch one user by numeric identifier or by username.
#[utoipa::path(
    get,
    path = "/users/{identifier}",
    params(("identifier" = String, Path, description = "Positive integer id, or a username")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{identifier}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let lookup = UserLookup::parse(&path.into_inner());
    let user = state.users_query.find_user(lookup).await?;
    Ok(web::Json(user))
}

/// Register the user endpoints.
///
/// `search_users` is registered before `get_user` so `/users/search` is not
/// read as a username.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_user)
        .service(update_user)
        .service(search_users)
        .service(get_user);
}
