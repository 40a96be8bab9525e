//! Domain layer: closure engine, ordering, tree assembly, and the
//! service facade that wraps them with transactions and deadlines.
//!
//! Layering rule: this module may depend on `pagetree-db`/`pagetree-errors`
//! but is never imported by them — dependencies point one way, from the
//! API layer down through the domain layer to storage.

pub mod closure;
pub mod ordering;
pub mod service;
pub mod tree;

pub use service::{PageWithSubPages, PagesService, ServiceConfig};
pub use tree::PageNode;
