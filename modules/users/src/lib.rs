//! User signup/signin: password hashing and bearer-token issuance sit
//! behind `domain::UsersService`; `api` mounts `/auth/signup` and
//! `/auth/signin` (§4.2 collaborator, §6.1).

pub mod api;
pub mod domain;

pub use domain::UsersService;
