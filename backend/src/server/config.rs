//! Service configuration loaded via OrthoConfig, plus the server config object.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

use users_service::outbound::persistence::{DbPool, PoolConfig};

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_NAME: &str = "users";
const DEFAULT_USERNAME: &str = "postgres";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5_000;

/// Environment variable overriding the listen address.
pub const BIND_ADDR_ENV: &str = "BIND_ADDR";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while assembling the database URL.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseUrlError {
    #[error("invalid database URL: {0}")]
    Parse(#[from] url::ParseError),
    #[error("database URL cannot carry credentials for host {host}")]
    Credentials { host: String },
}

/// Database connection settings, read from `DB_*` environment variables.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DB")]
pub struct DatabaseSettings {
    /// Server host name.
    pub host: Option<String>,
    /// Server port.
    pub port: Option<u16>,
    /// Database name.
    pub name: Option<String>,
    /// Role used to connect.
    pub username: Option<String>,
    /// Password for `username`.
    pub password: Option<String>,
    /// Full connection URL; takes precedence over the individual parts.
    pub url: Option<String>,
    /// Upper bound on pooled connections.
    pub max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub connect_timeout_secs: Option<u64>,
    /// Milliseconds allowed for each repository operation.
    pub query_timeout_ms: Option<u64>,
}

impl DatabaseSettings {
    /// Connection URL, either `DB_URL` verbatim or assembled from the parts.
    pub fn database_url(&self) -> Result<String, DatabaseUrlError> {
        if let Some(url) = &self.url {
            return Ok(Url::parse(url)?.into());
        }
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        let mut url = Url::parse(&format!("postgres://{host}:{port}"))?;
        url.set_path(self.name.as_deref().unwrap_or(DEFAULT_NAME));
        let credentials = || DatabaseUrlError::Credentials {
            host: host.to_owned(),
        };
        url.set_username(self.username.as_deref().unwrap_or(DEFAULT_USERNAME))
            .map_err(|()| credentials())?;
        url.set_password(self.password.as_deref())
            .map_err(|()| credentials())?;
        Ok(url.into())
    }

    /// Pool configuration derived from these settings.
    pub fn pool_config(&self) -> Result<PoolConfig, DatabaseUrlError> {
        Ok(PoolConfig::new(self.database_url()?)
            .with_max_size(self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS))
            .with_connection_timeout(Duration::from_secs(
                self.connect_timeout_secs
                    .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS),
            )))
    }

    /// Deadline applied to each repository operation.
    #[must_use]
    pub fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms.unwrap_or(DEFAULT_QUERY_TIMEOUT_MS))
    }
}

/// Listen address from `BIND_ADDR`, defaulting to `0.0.0.0:8080`.
pub fn bind_addr_from_env() -> std::io::Result<SocketAddr> {
    let raw = std::env::var(BIND_ADDR_ENV).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned());
    raw.parse().map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{BIND_ADDR_ENV}={raw} is not a socket address: {err}"),
        )
    })
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) query_timeout: Duration,
}

impl ServerConfig {
    /// Construct a server configuration around an established pool.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
        }
    }

    /// Override the per-operation repository deadline.
    #[must_use]
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }
}
