use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use pagetree_errors::ApiError;

use crate::claims::Claims;
use crate::config::TokenConfig;

/// Issues a bearer token for `user_id`, valid for `config`'s lifespan
/// (§4.2).
///
/// # Errors
///
/// Returns [`ApiError::Internal`] if encoding fails.
pub fn generate_token(user_id: i64, config: &TokenConfig) -> Result<String, ApiError> {
    let exp = Utc::now() + chrono::Duration::hours(config.hour_lifespan());
    let claims = Claims {
        user_id,
        exp: exp.timestamp(),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret()),
    )
    .map_err(|e| ApiError::internal_with("failed to issue token", e))
}

/// Validates a bearer token and returns the claims it carries.
///
/// A token is valid iff its signature checks against `config`'s secret,
/// `exp` has not passed, and its signing method is HMAC (§4.2) — the
/// latter is enforced by constraining `Validation` to `HS256` rather than
/// trusting the token's own header.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] for any signature, expiry, or
/// decoding failure.
pub fn validate_token(token: &str, config: &TokenConfig) -> Result<Claims, ApiError> {
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &DecodingKey::from_secret(config.secret()), &validation)
        .map(|data| data.claims)
        .map_err(|_| ApiError::unauthorized("invalid or expired token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TokenConfig {
        temp_env::with_vars(
            [
                ("TOKEN_SECRET", Some("s3cr3t")),
                ("TOKEN_HOUR_LIFESPAN", Some("1")),
            ],
            || TokenConfig::from_env().expect("valid config"),
        )
    }

    #[test]
    fn round_trips_user_id() {
        let cfg = config();
        let token = generate_token(42, &cfg).expect("token issued");
        let claims = validate_token(&token, &cfg).expect("token valid");
        assert_eq!(claims.user_id, 42);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let cfg = config();
        let token = generate_token(42, &cfg).expect("token issued");
        let other = temp_env::with_vars(
            [
                ("TOKEN_SECRET", Some("different")),
                ("TOKEN_HOUR_LIFESPAN", Some("1")),
            ],
            || TokenConfig::from_env().expect("valid config"),
        );
        assert!(validate_token(&token, &other).is_err());
    }

    #[test]
    fn malformed_token_is_rejected() {
        let cfg = config();
        assert!(validate_token("not-a-jwt", &cfg).is_err());
    }
}
