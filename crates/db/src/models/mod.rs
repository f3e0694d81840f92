//! Row structs and insert DTOs.
//!
//! JSON-valued columns (`tags`, `inputs`, `execute_request`, `attempts`) are
//! stored as TEXT and decoded through [`sqlx::types::Json`].

pub mod history;
pub mod script;
