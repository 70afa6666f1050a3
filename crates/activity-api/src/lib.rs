//! # activity-api
//!
//! REST API server built with Axum framework.
//!
//! Every protected route carries an operation guard layer; the role policy
//! is checked there, before extraction and before any service runs.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
