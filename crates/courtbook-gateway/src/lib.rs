//! HTTP/JSON API for Courtbook.
//!
//! All routes live under `/api` and answer with the [`ApiResponse`] envelope.

/// Admin password check and health probe.
pub mod admin;
/// Game session and roster handlers.
pub mod handlers;
/// CORS, rate limiting and gateway settings.
pub mod middleware;
/// Response envelope and error mapping.
pub mod response;
/// Router assembly and serving.
pub mod server;

pub use middleware::GatewayConfig;
pub use response::{ApiError, ApiResponse};
pub use server::GatewayServer;
