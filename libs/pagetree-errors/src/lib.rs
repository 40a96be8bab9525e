//! Canonical error taxonomy for the page tree service.
//!
//! Every fallible operation in `pages` and `users` returns [`ApiError`].
//! The taxonomy has exactly four kinds, matching the four HTTP status
//! families the service ever returns to a client: bad request,
//! unauthorized, not found, and internal. Constructors take an
//! end-user-facing message; the optional `source` is logged but never
//! rendered to the client.

use std::fmt;

#[cfg(feature = "axum")]
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;

/// A single error kind in the service's taxonomy.
///
/// See the module documentation for the mapping rules each variant
/// follows.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed input, failed validation, or an illegal operation
    /// (e.g. a cyclic reparent).
    BadRequest {
        message: String,
        source: Option<anyhow::Error>,
    },
    /// Missing or invalid bearer token, or an ownership mismatch on a
    /// path where identity alone is the gate.
    Unauthorized {
        message: String,
        source: Option<anyhow::Error>,
    },
    /// The addressed resource does not exist, or exists but is owned
    /// by a different user. The two cases are deliberately
    /// indistinguishable to the caller.
    NotFound {
        message: String,
        source: Option<anyhow::Error>,
    },
    /// Unexpected database error, failed commit, or encoding failure.
    /// The client never sees `source`; only the generic message.
    Internal {
        message: String,
        source: Option<anyhow::Error>,
    },
}

impl ApiError {
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an internal error together with its cause for logging.
    #[must_use]
    pub fn internal_with(message: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message rendered to the client. Internal errors never leak
    /// their `source`, only a generic string.
    #[must_use]
    pub fn client_message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::NotFound { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    #[must_use]
    pub fn source(&self) -> Option<&anyhow::Error> {
        match self {
            Self::BadRequest { source, .. }
            | Self::Unauthorized { source, .. }
            | Self::NotFound { source, .. }
            | Self::Internal { source, .. } => source.as_ref(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.client_message())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source().map(|e| e.as_ref())
    }
}

/// A single entry in the `{errors: [...]}` envelope (§6.1).
#[derive(Debug, Serialize)]
struct ErrorEntry {
    error: String,
}

/// Wire shape of an error response: `{errors: [{error: "<msg>"}, ...]}`.
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    errors: Vec<ErrorEntry>,
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(err: &ApiError) -> Self {
        Self {
            errors: vec![ErrorEntry {
                error: err.client_message().to_owned(),
            }],
        }
    }
}

#[cfg(feature = "axum")]
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Internal { .. }) {
            if let Some(source) = self.source() {
                tracing::error!(error = %source, message = %self.client_message(), "internal error");
            } else {
                tracing::error!(message = %self.client_message(), "internal error");
            }
        }
        let status = self.status();
        let body = ErrorEnvelope::from(&self);
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::internal("x").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn internal_error_hides_source_from_client_message() {
        let err = ApiError::internal_with("failed to duplicate page", anyhow::anyhow!("db says no"));
        assert_eq!(err.client_message(), "failed to duplicate page");
        assert!(err.source().is_some());
    }

    #[test]
    fn envelope_shape() {
        let err = ApiError::not_found("page not found");
        let envelope = ErrorEnvelope::from(&err);
        let json = serde_json::to_value(&envelope).expect("serializable");
        assert_eq!(json["errors"][0]["error"], "page not found");
    }
}
