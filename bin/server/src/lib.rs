//! idbridge HTTP server.
//!
//! Wires the identity orchestrator, profile service and request pipeline
//! into an Axum router, with Postgres or in-memory account storage.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
