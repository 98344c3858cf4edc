//! API Module
//!
//! HTTP handlers and routing for the assistant and cache endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
