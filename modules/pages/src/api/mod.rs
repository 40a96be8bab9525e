//! HTTP surface for the page hierarchy engine (§4.8, §6.1).

mod dto;
mod handlers;
mod router;
mod state;

pub use router::router;
pub use state::PagesState;
