//! Shared application state handed to every router as axum `State` (§2).
//!
//! A thin DI container, in the house style: one `Arc`-wrapped service per
//! module, implementing each module's state trait plus `FromRef` for
//! whatever the `AuthUser` extractor needs.

use std::sync::Arc;

use axum::extract::FromRef;
use pages::PagesService;
use pages::api::PagesState;
use pagetree_auth::TokenConfig;
use users::UsersService;
use users::api::UsersState;

#[derive(Clone)]
pub struct AppState {
    pages_service: Arc<PagesService>,
    users_service: Arc<UsersService>,
    token_config: TokenConfig,
}

impl AppState {
    #[must_use]
    pub fn new(pages_service: PagesService, users_service: UsersService, token_config: TokenConfig) -> Self {
        Self {
            pages_service: Arc::new(pages_service),
            users_service: Arc::new(users_service),
            token_config,
        }
    }
}

impl PagesState for AppState {
    fn pages_service(&self) -> &PagesService {
        &self.pages_service
    }

    fn token_config(&self) -> &TokenConfig {
        &self.token_config
    }
}

impl UsersState for AppState {
    fn users_service(&self) -> &UsersService {
        &self.users_service
    }
}

impl FromRef<AppState> for TokenConfig {
    fn from_ref(state: &AppState) -> Self {
        state.token_config.clone()
    }
}
