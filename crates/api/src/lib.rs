//! HTTP API layer for dispute-desk.
//!
//! - **Endpoints**: dispute listing, detail, stats, sync, assignment, evidence
//! - **Extractors**: authenticated staff user
//! - **Middleware**: bearer token authentication
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;

pub use endpoints::{health, router};
pub use middleware::{AppState, auth_middleware};
