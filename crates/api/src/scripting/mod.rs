//! Services that combine the core engine with the database.
//!
//! - [`loader`] rebuilds the script catalog from disk.
//! - [`orchestrator`] runs a catalog script and records its history.

pub mod loader;
pub mod orchestrator;
