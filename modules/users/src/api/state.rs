//! The contract the hosting application's shared state must satisfy for
//! the `users` API router to be mounted (mirrors `pages::api::PagesState`).

use crate::domain::UsersService;

pub trait UsersState: Clone + Send + Sync + 'static {
    fn users_service(&self) -> &UsersService;
}
