pub mod pages;
pub mod pages_closures;
pub mod users;
