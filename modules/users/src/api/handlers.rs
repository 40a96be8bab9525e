//! `/auth` route handlers (§6.1, §4.8). Public routes — no `AuthUser`
//! extraction here.

use axum::Json;
use axum::extract::State;
use pagetree_errors::ApiError;

use super::dto::{SignInRequest, SignUpRequest, TokenResponse};
use super::state::UsersState;

pub async fn signup<S: UsersState>(
    State(state): State<S>,
    Json(body): Json<SignUpRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .users_service()
        .signup(&body.email, &body.username, &body.password)
        .await?;
    Ok(Json(TokenResponse { token }))
}

pub async fn signin<S: UsersState>(
    State(state): State<S>,
    Json(body): Json<SignInRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.users_service().signin(&body.email, &body.password).await?;
    Ok(Json(TokenResponse { token }))
}
