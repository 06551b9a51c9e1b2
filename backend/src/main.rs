//! Service entry-point: loads settings, migrates the schema and serves the
//! users API.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{DatabaseSettings, ServerConfig, bind_addr_from_env, create_server};
use users_service::inbound::http::health::HealthState;
use users_service::outbound::persistence::{DbPool, migrate};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = DatabaseSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let pool_config = settings
        .pool_config()
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let database_url = pool_config.database_url().to_owned();

    let applied = migrate(database_url)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    info!(applied, "schema is up to date");

    let db_pool = DbPool::new(pool_config)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let bind_addr = bind_addr_from_env()?;
    let config = ServerConfig::new(bind_addr, db_pool).with_query_timeout(settings.query_timeout());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "listening");
    server.await
}
