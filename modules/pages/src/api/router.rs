//! Route wiring for `/pages` (§6.1).

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::Router;
use pagetree_auth::TokenConfig;

use super::handlers;
use super::state::PagesState;

/// Builds the `/pages` sub-router. `S` must be able to hand out both a
/// [`pages::PagesService`](crate::PagesService) (via [`PagesState`]) and a
/// [`TokenConfig`] (via [`FromRef`], required by the `AuthUser` extractor
/// every route here uses).
#[must_use]
pub fn router<S>() -> Router<S>
where
    S: PagesState + Clone + Send + Sync + 'static,
    TokenConfig: FromRef<S>,
{
    Router::new()
        .route("/pages", post(handlers::create_page::<S>).get(handlers::list_pages::<S>))
        .route(
            "/pages/{id}",
            get(handlers::get_page::<S>)
                .put(handlers::update_page::<S>)
                .delete(handlers::delete_page::<S>),
        )
        .route("/pages/{id}/reorder", post(handlers::reorder_page::<S>))
        .route("/pages/{id}/duplicate", post(handlers::duplicate_page::<S>))
}
