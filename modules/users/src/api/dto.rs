//! Request/response wire shapes for `/auth` routes (§6.1).

use serde::{Deserialize, Serialize};

/// `POST /auth/signup` body.
#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// `POST /auth/signin` body.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/signup`, `POST /auth/signin` response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
