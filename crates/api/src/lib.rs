//! dev-loop API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, and
//! the loader / orchestrator services) so integration tests and the binary
//! entrypoint share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod scripting;
pub mod state;
