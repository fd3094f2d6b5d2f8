//! HTTP API layer for drinklog.
//!
//! - **Endpoints**: accounts, records, calendar, analysis, community
//! - **Extractors**: authenticated user, JSON bodies with error mapping
//! - **Middleware**: bearer token authentication
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
