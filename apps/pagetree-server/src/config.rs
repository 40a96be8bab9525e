//! Environment configuration (§6.2).
//!
//! `TOKEN_SECRET`/`TOKEN_HOUR_LIFESPAN`/`APP_ENV` are read directly by
//! `pagetree_auth::TokenConfig`/`AppEnv` (kept as plain `std::env` reads —
//! they are the collaborator's own concern). Everything that shapes the
//! binary itself is collected here via `figment`'s `Env` provider into one
//! typed, fail-fast-validated struct.

use std::net::SocketAddr;
use std::time::Duration;

use figment::Figment;
use figment::providers::Env;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_SHUTDOWN_TIMEOUT: &str = "5s";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read server configuration: {0}")]
    Figment(#[from] figment::Error),
    #[error("APP_SHUTDOWN_TIMEOUT {0:?} is not a valid duration")]
    InvalidShutdownTimeout(String),
    #[error("BIND_ADDR {0:?} is not a valid socket address")]
    InvalidBindAddr(String),
}

#[derive(Debug, Deserialize)]
struct RawServerConfig {
    database_url: String,
    bind_addr: Option<String>,
    app_shutdown_timeout: Option<String>,
}

/// Everything the binary needs besides the Identity & Authorization
/// collaborator's own env reads (§6.2).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub shutdown_timeout: Duration,
}

impl ServerConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `DATABASE_URL` is missing, or if
    /// `BIND_ADDR`/`APP_SHUTDOWN_TIMEOUT` are set but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: RawServerConfig = Figment::new().merge(Env::raw()).extract()?;

        let bind_addr = raw.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        let bind_addr = bind_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr.to_owned()))?;

        let shutdown_raw = raw.app_shutdown_timeout.as_deref().unwrap_or(DEFAULT_SHUTDOWN_TIMEOUT);
        let shutdown_timeout = humantime::parse_duration(shutdown_raw)
            .map_err(|_| ConfigError::InvalidShutdownTimeout(shutdown_raw.to_owned()))?;

        Ok(Self {
            database_url: raw.database_url,
            bind_addr,
            shutdown_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_database_url_is_an_error() {
        temp_env::with_vars_unset(["DATABASE_URL"], || {
            assert!(ServerConfig::from_env().is_err());
        });
    }

    #[test]
    fn defaults_apply_when_optional_vars_are_unset() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("sqlite::memory:")),
                ("BIND_ADDR", None),
                ("APP_SHUTDOWN_TIMEOUT", None),
            ],
            || {
                let cfg = ServerConfig::from_env().expect("valid config");
                assert_eq!(cfg.shutdown_timeout, Duration::from_secs(5));
                assert_eq!(cfg.bind_addr.port(), 8080);
            },
        );
    }

    #[test]
    fn malformed_shutdown_timeout_is_rejected() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("sqlite::memory:")),
                ("APP_SHUTDOWN_TIMEOUT", Some("not-a-duration")),
            ],
            || {
                assert!(matches!(
                    ServerConfig::from_env(),
                    Err(ConfigError::InvalidShutdownTimeout(_))
                ));
            },
        );
    }
}
