//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{UsersCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users_command: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
}

impl HttpState {
    /// Construct state from the command and query ports.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use users_service::domain::UserService;
    /// use users_service::inbound::http::state::HttpState;
    /// use users_service::outbound::persistence::DieselUserRepository;
    ///
    /// fn wire(service: Arc<UserService<DieselUserRepository>>) -> HttpState {
    ///     HttpState::new(service.clone(), service)
    /// }
    /// ```
    pub fn new(users_command: Arc<dyn UsersCommand>, users_query: Arc<dyn UsersQuery>) -> Self {
        Self {
            users_command,
            users_query,
        }
    }

    /// Construct state from one value implementing both ports.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: UsersCommand + UsersQuery + 'static,
    {
        Self {
            users_command: service.clone(),
            users_query: service,
        }
    }
}
