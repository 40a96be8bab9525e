//! The axum extractor side of request authorization (§4.2, §4.8).
//!
//! Replaces the gin-middleware-plus-context-map approach of the original
//! (`c.Set("user_id", ...)`, then a type assertion in every handler) with a
//! typed extractor: a handler that takes `AuthUser` as an argument cannot
//! compile unless axum has already produced one, which it only does after
//! a valid bearer token has been checked (see REDESIGN FLAGS in
//! SPEC_FULL.md).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use pagetree_errors::ApiError;

use crate::config::TokenConfig;
use crate::token::validate_token;

/// The authenticated caller's numeric user id, extracted from a validated
/// bearer token (§4.2).
///
/// Any handler that declares `AuthUser` as a parameter is unreachable
/// without a valid `Authorization: Bearer <token>` header — axum runs the
/// extractor before the handler body, and a failed extraction short-circuits
/// to the `ApiError` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub i64);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    TokenConfig: axum::extract::FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = TokenConfig::from_ref(state);
        let token = extract_bearer_token(parts).ok_or_else(|| ApiError::unauthorized("missing bearer token"))?;
        let claims = validate_token(token, &config)?;
        Ok(Self(claims.user_id))
    }
}

/// Reads `Authorization: Bearer <token>` off the request, returning `None`
/// for a missing header, a non-UTF8 value, or the wrong scheme (§4.2).
fn extract_bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
}
