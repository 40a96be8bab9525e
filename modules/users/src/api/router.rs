//! Route wiring for `/auth` (§6.1). Both routes are public; no
//! `Authorization` header is required or consulted.

use axum::Router;
use axum::routing::post;

use super::handlers;
use super::state::UsersState;

#[must_use]
pub fn router<S>() -> Router<S>
where
    S: UsersState + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/auth/signup", post(handlers::signup::<S>))
        .route("/auth/signin", post(handlers::signin::<S>))
}
