// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hunt orchestrator: steps a `HuntModule` against a session's remote
//! shell, collecting truncated observations and handing the result to the
//! AI pipeline (§4.4).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{error, info, warn};

use warden_core::{
    truncate_utf8, Clock, HuntExecution, HuntExecutionId, HuntModule, HuntState, Observation,
    SessionId, SudoMethod, STDERR_TRUNCATE_BYTES, STDOUT_TRUNCATE_BYTES,
};
use warden_shell::{sudo, ExecOutput, ShellConnection, ShellError};

/// Narrows the orchestrator's dependency on the remote-shell engine to the
/// one operation it needs, so a hunt can be driven against a fake runner in
/// tests instead of a live `ssh2` connection.
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    async fn exec(&self, command: &str, timeout: Duration, stdin: Option<String>) -> Result<ExecOutput, ShellError>;
}

#[async_trait::async_trait]
impl CommandRunner for ShellConnection {
    async fn exec(&self, command: &str, timeout: Duration, stdin: Option<String>) -> Result<ExecOutput, ShellError> {
        ShellConnection::exec(self, command, timeout, stdin).await
    }
}

#[derive(Debug, Error)]
pub enum HuntError {
    #[error("hunt module `{0}` not found")]
    ModuleNotFound(String),
    #[error("remote shell error: {0}")]
    Shell(#[from] ShellError),
}

/// Per-step sudo context, snapshotted once at hunt start so a mid-hunt
/// credential rotation (reconnect with new creds) can't race a step that's
/// already executing (§4.4 step 2).
#[derive(Debug, Clone)]
pub struct SudoContext {
    pub method: SudoMethod,
    pub ssh_password: Option<String>,
    pub custom_sudo_password: Option<String>,
    pub username: String,
}

/// Cooperative cancellation flag shared between the caller and the running
/// hunt task (§9: cooperative cancellation, checked at step boundaries).
#[derive(Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Narrow surface the orchestrator needs from the rest of the system,
/// so this module doesn't depend on the daemon's event bus or storage
/// crate directly.
#[async_trait::async_trait]
pub trait HuntSink: Send + Sync {
    async fn emit_started(&self, session_id: &SessionId, execution_id: &HuntExecutionId);
    async fn emit_step_started(&self, session_id: &SessionId, execution_id: &HuntExecutionId, step_id: &str);
    async fn emit_observation(&self, session_id: &SessionId, execution_id: &HuntExecutionId, observation: &Observation);
    async fn emit_step_completed(&self, session_id: &SessionId, execution_id: &HuntExecutionId, step_id: &str);
    async fn emit_completed(&self, session_id: &SessionId, execution_id: &HuntExecutionId, findings_count: usize);
    async fn emit_cancelled(&self, session_id: &SessionId, execution_id: &HuntExecutionId);
    async fn emit_failed(&self, session_id: &SessionId, execution_id: &HuntExecutionId, error: &str);
}

/// Invoked once all steps complete, when the caller requested AI analysis
/// (§4.4 step 4). Failures are logged by the implementation and must never
/// propagate as an `Err` here — the hunt completes regardless of AI outcome.
#[async_trait::async_trait]
pub trait HuntAiHook: Send + Sync {
    async fn analyze(&self, execution: &HuntExecution) -> usize;
}

/// Runs one hunt module to completion, returning the finished execution.
/// When `ai_hook` is `Some`, it is invoked after all steps complete and
/// before the execution is marked `Completed`, matching §4.4's step
/// ordering (run steps, then AI, then transition to COMPLETED).
pub async fn run_hunt<C: Clock>(
    clock: &C,
    connection: &dyn CommandRunner,
    module: &HuntModule,
    mut execution: HuntExecution,
    sudo_ctx: &SudoContext,
    cancel: &CancelFlag,
    sink: &dyn HuntSink,
    ai_hook: Option<&dyn HuntAiHook>,
) -> HuntExecution {
    execution.state = HuntState::Running;
    sink.emit_started(&execution.session_id, &execution.id).await;
    info!(session_id = %execution.session_id, hunt_execution_id = %execution.id, "hunt started");

    for step in &module.steps {
        if cancel.is_cancelled() {
            execution.state = HuntState::Cancelled;
            execution.finished_at = Some(clock.now());
            sink.emit_cancelled(&execution.session_id, &execution.id).await;
            warn!(session_id = %execution.session_id, hunt_execution_id = %execution.id, "hunt cancelled");
            return execution;
        }

        sink.emit_step_started(&execution.session_id, &execution.id, step.id.as_str()).await;

        let wrapped = sudo::wrap(
            &step.command,
            step.requires_sudo,
            sudo_ctx.method,
            sudo_ctx.ssh_password.as_deref(),
            sudo_ctx.custom_sudo_password.as_deref(),
        );

        let exec_result = connection
            .exec(&wrapped.command, Duration::from_secs(step.timeout_seconds), wrapped.stdin_password)
            .await;

        let observation = match exec_result {
            Ok(output) => {
                let stderr = sudo::scrub_sudo_prompt(&output.stderr, &sudo_ctx.username);
                let (stdout, stdout_truncated) = truncate_utf8(&output.stdout, STDOUT_TRUNCATE_BYTES);
                let (stderr, stderr_truncated) = truncate_utf8(&stderr, STDERR_TRUNCATE_BYTES);
                Observation {
                    step_id: step.id.clone(),
                    command: wrapped.command.clone(),
                    stdout,
                    stderr,
                    exit_code: output.exit_code,
                    truncated: stdout_truncated || stderr_truncated,
                }
            }
            Err(e) => {
                error!(session_id = %execution.session_id, step_id = %step.id, error = %e, "step execution failed");
                execution.state = HuntState::Failed;
                execution.finished_at = Some(clock.now());
                sink.emit_failed(&execution.session_id, &execution.id, &e.to_string()).await;
                return execution;
            }
        };

        sink.emit_observation(&execution.session_id, &execution.id, &observation).await;
        execution.observations.push(observation);
        sink.emit_step_completed(&execution.session_id, &execution.id, step.id.as_str()).await;
    }

    let findings_count = match ai_hook {
        Some(hook) => hook.analyze(&execution).await,
        None => 0,
    };

    execution.state = HuntState::Completed;
    execution.finished_at = Some(clock.now());
    sink.emit_completed(&execution.session_id, &execution.id, findings_count).await;
    info!(session_id = %execution.session_id, hunt_execution_id = %execution.id, "hunt completed");
    execution
}

/// Constructs a fresh `HuntExecution` in `Pending` state, ready for
/// `run_hunt`. `started_at` is set only once the caller transitions it to
/// `Running` via `run_hunt`, but the row must exist (state `Pending`)
/// before the background task spawns (§4.4 step "create ... in PENDING").
pub fn new_pending_execution<C: Clock>(
    clock: &C,
    id: HuntExecutionId,
    session_id: SessionId,
    module: &HuntModule,
) -> HuntExecution {
    HuntExecution {
        id,
        session_id,
        module_id: module.id.clone(),
        state: HuntState::Pending,
        started_at: clock.now(),
        finished_at: None,
        observations: Vec::new(),
        ai_report_text: None,
    }
}

pub fn resolve_module<'a>(
    modules: &'a [HuntModule],
    module_id: &str,
) -> Result<&'a HuntModule, HuntError> {
    modules
        .iter()
        .find(|m| m.id.as_str() == module_id)
        .ok_or_else(|| HuntError::ModuleNotFound(module_id.to_string()))
}

#[cfg(test)]
#[path = "hunt_orchestrator_tests.rs"]
mod tests;
