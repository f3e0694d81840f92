//! Script execution engine.
//!
//! [`executor`] resolves what to run, [`subprocess`] spawns it, [`runner`]
//! applies the repeat / retry / backoff policy, and [`redact`] masks values
//! for incognito history records.

pub mod executor;
pub mod redact;
pub mod runner;
pub mod subprocess;

pub use executor::{CommandSpec, ExecuteRequest, ProcessLauncher, ProcessOutput, ScriptError};
pub use runner::{run_with_policy, IterationResult, RunPolicy, RunSummary};
pub use subprocess::SystemLauncher;
