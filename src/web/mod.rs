//! Web interface module
//!
//! Thin HTTP layer over the storage engine and the rate limiter:
//! JSON marshaling, query parsing and status mapping only.

mod error;
mod handlers;
mod middleware;
mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use middleware::client_identity;
pub use server::{create_router, run_web_server};
