//! HTTP surface for the weather agent.
//!
//! Routes, the JSON envelope, error mapping and the serve loop live here so
//! integration tests can drive the router directly.

pub mod envelope;
pub mod error;
pub mod handler;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
