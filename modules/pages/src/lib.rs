//! Page hierarchy domain service and its axum API surface (§2, §4.3-§4.8).
//!
//! `domain` is the closure engine, ordering, and tree assembly; `api` is the
//! thin axum layer that turns HTTP requests into calls on
//! [`domain::PagesService`] and maps outcomes to the §6.1 response shapes.

pub mod api;
pub mod domain;

pub use domain::{PageNode, PageWithSubPages, PagesService, ServiceConfig};
