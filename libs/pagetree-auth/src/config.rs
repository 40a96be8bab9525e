use std::env;

use thiserror::Error;

const DEFAULT_TOKEN_HOUR_LIFESPAN: &str = "24";

/// Selects the bcrypt cost factor (§4.2): 10 outside production, 12 in it.
///
/// Read from `APP_ENV`, falling back to `GO_ENV` for drop-in compatibility
/// with the original service's environment file naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    #[must_use]
    pub fn from_env() -> Self {
        let raw = env::var("APP_ENV")
            .or_else(|_| env::var("GO_ENV"))
            .unwrap_or_default();
        if raw.eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    #[must_use]
    pub fn bcrypt_cost(self) -> u32 {
        match self {
            Self::Development => 10,
            Self::Production => 12,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOKEN_SECRET environment variable is required")]
    MissingSecret,
    #[error("TOKEN_HOUR_LIFESPAN must be a positive integer, got {0:?}")]
    InvalidLifespan(String),
}

/// Token signing secret and lifespan, read from the environment at startup
/// (§6.2). Initialization fails fast rather than at first request.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Vec<u8>,
    hour_lifespan: i64,
}

impl TokenConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingSecret`] if `TOKEN_SECRET` is unset,
    /// or [`ConfigError::InvalidLifespan`] if `TOKEN_HOUR_LIFESPAN` is set
    /// but not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var("TOKEN_SECRET").map_err(|_| ConfigError::MissingSecret)?;
        let lifespan_raw =
            env::var("TOKEN_HOUR_LIFESPAN").unwrap_or_else(|_| DEFAULT_TOKEN_HOUR_LIFESPAN.to_owned());
        let hour_lifespan: i64 = lifespan_raw
            .parse()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ConfigError::InvalidLifespan(lifespan_raw))?;
        Ok(Self {
            secret: secret.into_bytes(),
            hour_lifespan,
        })
    }

    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    #[must_use]
    pub fn hour_lifespan(&self) -> i64 {
        self.hour_lifespan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_secret_is_an_error() {
        temp_env::with_vars_unset(["TOKEN_SECRET"], || {
            assert!(matches!(TokenConfig::from_env(), Err(ConfigError::MissingSecret)));
        });
    }

    #[test]
    fn non_positive_lifespan_is_rejected() {
        temp_env::with_vars(
            [
                ("TOKEN_SECRET", Some("s3cr3t")),
                ("TOKEN_HOUR_LIFESPAN", Some("0")),
            ],
            || {
                assert!(matches!(
                    TokenConfig::from_env(),
                    Err(ConfigError::InvalidLifespan(_))
                ));
            },
        );
    }

    #[test]
    fn default_lifespan_is_24_hours() {
        temp_env::with_vars(
            [("TOKEN_SECRET", Some("s3cr3t")), ("TOKEN_HOUR_LIFESPAN", None)],
            || {
                let cfg = TokenConfig::from_env().expect("valid config");
                assert_eq!(cfg.hour_lifespan(), 24);
            },
        );
    }

    #[test]
    fn production_env_selects_cost_12() {
        temp_env::with_var("APP_ENV", Some("production"), || {
            assert_eq!(AppEnv::from_env().bcrypt_cost(), 12);
        });
    }

    #[test]
    fn development_env_selects_cost_10() {
        temp_env::with_vars_unset(["APP_ENV", "GO_ENV"], || {
            assert_eq!(AppEnv::from_env().bcrypt_cost(), 10);
        });
    }
}
