//! Models for the `history` table.

use devloop_core::scripting::{ExecuteRequest, IterationResult};
use devloop_core::types::{DbId, ScriptId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// One recorded execution of a script.
///
/// For incognito runs the stored args, env values, and output are already
/// masked; the repository never sees the real values.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryRecord {
    pub id: DbId,
    pub script_id: ScriptId,
    pub executed_at: Timestamp,
    pub finished_at: Timestamp,
    pub execute_request: Json<ExecuteRequest>,
    pub output: String,
    /// Exit code of the last repeat iteration.
    pub exitcode: i64,
    pub incognito: bool,
    /// Resolved command line that was run.
    pub command: String,
    /// Per-iteration outcomes, in order.
    pub attempts: Json<Vec<IterationResult>>,
}

/// DTO for inserting a history record.
#[derive(Debug, Clone)]
pub struct CreateHistory {
    pub script_id: ScriptId,
    pub executed_at: Timestamp,
    pub finished_at: Timestamp,
    pub execute_request: ExecuteRequest,
    pub output: String,
    pub exitcode: i64,
    pub incognito: bool,
    pub command: String,
    pub attempts: Vec<IterationResult>,
}
