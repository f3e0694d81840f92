//! Shared response bodies for API handlers.
//!
//! Collections and records are returned bare (`[...]` / `{...}`); the types
//! here cover the small acknowledgement bodies that several handlers share.

use serde::Serialize;

/// `{ "message": ... }` acknowledgement for delete actions.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Result of a folder load.
#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub message: &'static str,
    /// Number of scripts indexed.
    pub count: usize,
}
