//! API module for HTTP handlers, middleware, and DTOs.

mod doc;
pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod routes;

pub use doc::ApiDoc;
