//! Central script orchestrator service.
//!
//! Coordinates catalog lookup, command resolution, the repeat / retry run,
//! incognito masking, and the single history record written per call. Held
//! in [`AppState`](crate::state::AppState) as an `Arc<ScriptOrchestrator>`.

use chrono::Utc;
use devloop_core::config::DevLoopConfig;
use devloop_core::scripting::redact::{redact_request, MASK};
use devloop_core::scripting::{
    run_with_policy, CommandSpec, ExecuteRequest, ProcessLauncher, RunPolicy, SystemLauncher,
};
use devloop_db::models::history::CreateHistory;
use devloop_db::repositories::{HistoryRepo, ScriptRepo};
use devloop_db::DbPool;

use crate::error::{AppError, AppResult};

/// Runs catalog scripts through a [`ProcessLauncher`].
///
/// Lifecycle of one call:
/// 1. Load the script from the catalog.
/// 2. Normalize the request and resolve the interpreter command.
/// 3. Run under the repeat / retry / backoff policy.
/// 4. Write one history record, masked when incognito.
///
/// The caller always gets the real combined output, even for incognito runs
/// or when the history write fails.
pub struct ScriptOrchestrator<L = SystemLauncher> {
    pool: DbPool,
    launcher: L,
}

impl ScriptOrchestrator {
    /// Create an orchestrator that spawns real OS processes.
    pub fn new(pool: DbPool) -> Self {
        Self::with_launcher(pool, SystemLauncher)
    }
}

impl<L: ProcessLauncher> ScriptOrchestrator<L> {
    pub fn with_launcher(pool: DbPool, launcher: L) -> Self {
        Self { pool, launcher }
    }

    /// Execute a catalog script.
    ///
    /// A missing script is a 404 and an unresolvable command a 400; both are
    /// reported before anything runs or is recorded. Spawn failures and
    /// non-zero exits are part of the output, not errors.
    pub async fn execute(
        &self,
        script_id: &str,
        request: ExecuteRequest,
        incognito: bool,
        settings: &DevLoopConfig,
    ) -> AppResult<String> {
        let script = ScriptRepo::find_by_id(&self.pool, script_id)
            .await?
            .ok_or_else(|| AppError::not_found("script", script_id))?;

        let mut request = request.normalized();
        if request.command.is_empty() {
            request.command = settings
                .command_for(&script.path)
                .unwrap_or_default()
                .to_string();
        }

        // Request values override config values.
        let mut env = settings.environment_variables.clone();
        env.extend(request.env.clone());
        request.env = env;

        let spec = CommandSpec::resolve(&request.command, &script.path, &request.args, &request.env)
            .map_err(|e| AppError::BadRequest(format!("{e} '{}'", script.path)))?;
        let policy = RunPolicy::from_request(&request);

        tracing::info!(
            script_id,
            command = %request.command,
            repeat = policy.repeat,
            retry = policy.retry,
            incognito,
            "Executing script",
        );

        let executed_at = Utc::now();
        let summary = run_with_policy(&self.launcher, &spec, policy).await;
        let finished_at = Utc::now();

        let output = summary.combined_output();
        let exit_code = summary.exit_code();

        let (recorded_request, recorded_output) = if incognito {
            (redact_request(&request), MASK.to_string())
        } else {
            (request.clone(), output.clone())
        };

        let recorded = HistoryRepo::create(
            &self.pool,
            &CreateHistory {
                script_id: script.id.clone(),
                executed_at,
                finished_at,
                execute_request: recorded_request,
                output: recorded_output,
                exitcode: i64::from(exit_code),
                incognito,
                command: request.command.clone(),
                attempts: summary.iterations,
            },
        )
        .await;

        let duration_ms = (finished_at - executed_at).num_milliseconds();
        match recorded {
            Ok(history) => tracing::info!(
                script_id,
                history_id = history.id,
                exit_code,
                duration_ms,
                "Script execution recorded",
            ),
            Err(e) => tracing::error!(
                script_id,
                exit_code,
                duration_ms,
                error = %e,
                "Failed to record script execution",
            ),
        }

        Ok(output)
    }
}
