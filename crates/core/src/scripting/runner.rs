//! Repeat / retry / backoff policy around a [`ProcessLauncher`].
//!
//! One run consists of `repeat` sequential iterations. Each iteration makes up
//! to `retry + 1` attempts and keeps only the final attempt's output. Nothing
//! runs concurrently.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::executor::{CommandSpec, ExecuteRequest, ProcessLauncher, ProcessOutput};

/// Exit code recorded when the process could not be started at all.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = -1;

/// Normalized loop parameters for one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    pub repeat: u32,
    pub retry: u32,
    pub backoff: Duration,
}

impl RunPolicy {
    /// Derive the policy from an already-normalized request.
    pub fn from_request(request: &ExecuteRequest) -> Self {
        let request = request.clone().normalized();
        Self {
            repeat: u32::try_from(request.repeat).unwrap_or(u32::MAX),
            retry: u32::try_from(request.retry).unwrap_or(u32::MAX),
            backoff: Duration::from_millis(u64::try_from(request.backoff).unwrap_or(0)),
        }
    }
}

/// Outcome of one repeat iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationResult {
    /// 1-based iteration number.
    pub iteration: u32,
    /// Attempts spent, including the successful one.
    pub attempts: u32,
    pub exit_code: i32,
    /// Stdout then stderr of the final attempt.
    #[serde(skip)]
    pub output: String,
}

impl IterationResult {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Everything produced by [`run_with_policy`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub iterations: Vec<IterationResult>,
}

impl RunSummary {
    /// Iteration outputs joined with a newline.
    pub fn combined_output(&self) -> String {
        self.iterations
            .iter()
            .map(|it| it.output.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Exit code of the last iteration.
    pub fn exit_code(&self) -> i32 {
        self.iterations
            .last()
            .map(|it| it.exit_code)
            .unwrap_or(SPAWN_FAILURE_EXIT_CODE)
    }
}

/// Run `spec` under `policy`.
///
/// Spawn failures and non-zero exits are recorded in the summary, never
/// returned as errors.
pub async fn run_with_policy<L: ProcessLauncher>(
    launcher: &L,
    spec: &CommandSpec,
    policy: RunPolicy,
) -> RunSummary {
    let repeat = policy.repeat.max(1);
    // `repeat` comes straight from the request; grow as iterations finish.
    let mut summary = RunSummary::default();

    for iteration in 1..=repeat {
        let result = run_iteration(launcher, spec, policy, iteration).await;
        let failed = !result.succeeded();
        summary.iterations.push(result);

        if iteration < repeat {
            if failed {
                tokio::time::sleep(policy.backoff).await;
            }
            tokio::time::sleep(policy.backoff).await;
        }
    }

    summary
}

async fn run_iteration<L: ProcessLauncher>(
    launcher: &L,
    spec: &CommandSpec,
    policy: RunPolicy,
    iteration: u32,
) -> IterationResult {
    let max_attempts = policy.retry.saturating_add(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        let output = match launcher.launch(spec).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(
                    program = %spec.program,
                    iteration,
                    attempt,
                    error = %e,
                    "Script process failed to start",
                );
                ProcessOutput {
                    exit_code: SPAWN_FAILURE_EXIT_CODE,
                    ..Default::default()
                }
            }
        };

        if output.exit_code == 0 || attempt >= max_attempts {
            return IterationResult {
                iteration,
                attempts: attempt,
                exit_code: output.exit_code,
                output: output.combined(),
            };
        }

        tracing::debug!(
            iteration,
            attempt,
            exit_code = output.exit_code,
            "Attempt failed, retrying after backoff",
        );
        tokio::time::sleep(policy.backoff).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::scripting::executor::ScriptError;

    /// Launcher that replays a fixed sequence of results and counts calls.
    struct ScriptedLauncher {
        results: Mutex<VecDeque<Result<ProcessOutput, ScriptError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedLauncher {
        fn new(results: Vec<Result<ProcessOutput, ScriptError>>) -> Self {
            Self {
                results: Mutex::new(results.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().expect("lock")
        }
    }

    impl ProcessLauncher for ScriptedLauncher {
        async fn launch(&self, _spec: &CommandSpec) -> Result<ProcessOutput, ScriptError> {
            *self.calls.lock().expect("lock") += 1;
            self.results
                .lock()
                .expect("lock")
                .pop_front()
                .unwrap_or_else(|| Ok(ok("")))
        }
    }

    fn ok(stdout: &str) -> ProcessOutput {
        ProcessOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    fn fail(stdout: &str, code: i32) -> ProcessOutput {
        ProcessOutput {
            stdout: stdout.to_string(),
            stderr: String::new(),
            exit_code: code,
        }
    }

    fn spec() -> CommandSpec {
        CommandSpec {
            program: "sh".to_string(),
            args: vec!["/s/a.sh".to_string()],
            env: vec![],
        }
    }

    fn policy(repeat: u32, retry: u32) -> RunPolicy {
        RunPolicy {
            repeat,
            retry,
            backoff: Duration::from_millis(1),
        }
    }

    #[test]
    fn policy_from_request_applies_defaults() {
        let p = RunPolicy::from_request(&ExecuteRequest {
            retry: -3,
            ..Default::default()
        });
        assert_eq!(p.repeat, 1);
        assert_eq!(p.retry, 0);
        assert_eq!(p.backoff, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn repeat_runs_each_iteration_and_joins_output() {
        let launcher = ScriptedLauncher::new(vec![Ok(ok("one")), Ok(ok("two")), Ok(ok("three"))]);
        let summary = run_with_policy(&launcher, &spec(), policy(3, 0)).await;

        assert_eq!(launcher.calls(), 3);
        assert_eq!(summary.combined_output(), "one\ntwo\nthree");
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn retry_keeps_only_final_attempt_output() {
        let launcher = ScriptedLauncher::new(vec![
            Ok(fail("first", 1)),
            Ok(fail("second", 1)),
            Ok(ok("third")),
        ]);
        let summary = run_with_policy(&launcher, &spec(), policy(1, 5)).await;

        assert_eq!(launcher.calls(), 3);
        assert_eq!(summary.combined_output(), "third");
        assert_eq!(summary.iterations[0].attempts, 3);
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn retries_exhausted_keep_last_failure() {
        let launcher = ScriptedLauncher::new(vec![Ok(fail("a", 2)), Ok(fail("b", 3))]);
        let summary = run_with_policy(&launcher, &spec(), policy(1, 1)).await;

        assert_eq!(launcher.calls(), 2);
        assert_eq!(summary.combined_output(), "b");
        assert_eq!(summary.exit_code(), 3);
    }

    #[tokio::test]
    async fn spawn_failure_is_empty_output_and_minus_one() {
        let launcher = ScriptedLauncher::new(vec![Err(ScriptError::Spawn {
            program: "missing".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        })]);
        let summary = run_with_policy(&launcher, &spec(), policy(1, 0)).await;

        assert_eq!(summary.combined_output(), "");
        assert_eq!(summary.exit_code(), SPAWN_FAILURE_EXIT_CODE);
    }

    #[tokio::test]
    async fn exit_code_is_from_last_iteration() {
        let launcher = ScriptedLauncher::new(vec![Ok(fail("x", 7)), Ok(ok("y"))]);
        let summary = run_with_policy(&launcher, &spec(), policy(2, 0)).await;

        assert_eq!(summary.iterations[0].exit_code, 7);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(summary.combined_output(), "x\ny");
    }

    #[tokio::test]
    async fn zero_repeat_still_runs_once() {
        let launcher = ScriptedLauncher::new(vec![Ok(ok("only"))]);
        let summary = run_with_policy(&launcher, &spec(), policy(0, 0)).await;
        assert_eq!(launcher.calls(), 1);
        assert_eq!(summary.iterations.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_iteration_adds_one_backoff_before_the_next() {
        let backoff = Duration::from_millis(100);
        let run = |results| async move {
            let launcher = ScriptedLauncher::new(results);
            let policy = RunPolicy {
                repeat: 2,
                retry: 0,
                backoff,
            };
            let start = tokio::time::Instant::now();
            run_with_policy(&launcher, &spec(), policy).await;
            start.elapsed()
        };

        let clean = run(vec![Ok(ok("a")), Ok(ok("b"))]).await;
        let after_failure = run(vec![Ok(fail("a", 1)), Ok(ok("b"))]).await;
        let failed_last = run(vec![Ok(ok("a")), Ok(fail("b", 1))]).await;

        assert!(clean >= backoff && clean < backoff * 2, "{clean:?}");
        assert!(
            after_failure >= backoff * 2 && after_failure < backoff * 3,
            "{after_failure:?}"
        );
        assert!(failed_last >= backoff && failed_last < backoff * 2, "{failed_last:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn huge_repeat_does_not_preallocate() {
        let policy = RunPolicy::from_request(&ExecuteRequest {
            repeat: 4_000_000_000,
            backoff: 1,
            ..Default::default()
        });
        assert_eq!(policy.repeat, 4_000_000_000);

        let launcher = ScriptedLauncher::new(vec![]);
        let spec = spec();
        let run = run_with_policy(&launcher, &spec, policy);
        let result = tokio::time::timeout(Duration::from_millis(50), run).await;

        assert!(result.is_err());
        assert!(launcher.calls() > 1);
    }

    #[test]
    fn iteration_json_omits_output() {
        let it = IterationResult {
            iteration: 1,
            attempts: 2,
            exit_code: 0,
            output: "secret".to_string(),
        };
        let value = serde_json::to_value(&it).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"iteration": 1, "attempts": 2, "exit_code": 0})
        );
    }
}
