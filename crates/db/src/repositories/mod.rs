//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&SqlitePool` as the first argument.

pub mod history_repo;
pub mod script_repo;

pub use history_repo::HistoryRepo;
pub use script_repo::ScriptRepo;
