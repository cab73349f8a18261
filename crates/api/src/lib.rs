//! Section Factory API library.
//!
//! The HTTP server is exposed as a library so the router can be driven
//! in-process by tests and reused by the CLI (storage, seeding).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod seed;
pub mod state;

use axum::Router;

use state::AppState;

/// Build the application router over the given state.
///
/// Sentry layers are not included; the binary adds them outermost.
pub fn app(state: AppState) -> Router {
    routes::router(state)
}
