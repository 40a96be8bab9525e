//! The contract the hosting application's shared state must satisfy for
//! the `pages` API router to be mounted (cf. the `AppServices<...>`
//! DI-container pattern used elsewhere in the house style).

use pagetree_auth::TokenConfig;

use crate::domain::PagesService;

pub trait PagesState: Clone + Send + Sync + 'static {
    fn pages_service(&self) -> &PagesService;
    fn token_config(&self) -> &TokenConfig;
}
