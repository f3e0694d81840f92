//! Domain logic for the dev-loop script dashboard.
//!
//! Everything in this crate is free of database access: metadata parsing,
//! folder discovery, the on-disk configuration file, and the process
//! execution engine. The `db` and `api` crates build on top of it.

pub mod config;
pub mod discovery;
pub mod error;
pub mod hashing;
pub mod metadata;
pub mod pagination;
pub mod scripting;
pub mod types;
