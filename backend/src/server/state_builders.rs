//! Builders for HTTP state ports and the repository-backed user service.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;

use users_service::domain::{UserService, UserValidator};
use users_service::inbound::http::state::HttpState;
use users_service::outbound::persistence::DieselUserRepository;

use super::ServerConfig;

/// Wire `DbPool` → `DieselUserRepository` → `UserService` → `HttpState`.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let repository = DieselUserRepository::new(config.db_pool.clone())
        .with_query_timeout(config.query_timeout);
    let validator = UserValidator::new(Arc::new(DefaultClock));
    let service = UserService::new(Arc::new(repository), validator);
    web::Data::new(HttpState::from_service(Arc::new(service)))
}
