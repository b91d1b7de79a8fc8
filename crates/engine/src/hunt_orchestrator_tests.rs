// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Mutex as StdMutex;

use chrono::{DateTime, Utc};
use warden_core::{FakeClock, HuntModuleId, HuntStep, HuntStepId, OsTag, Severity};

use super::*;

struct FakeRunner {
    responses: StdMutex<Vec<Result<ExecOutput, ShellError>>>,
}

impl FakeRunner {
    fn new(responses: Vec<Result<ExecOutput, ShellError>>) -> Self {
        Self {
            responses: StdMutex::new(responses),
        }
    }
}

#[async_trait::async_trait]
impl CommandRunner for FakeRunner {
    async fn exec(&self, _command: &str, _timeout: Duration, _stdin: Option<String>) -> Result<ExecOutput, ShellError> {
        self.responses.lock().expect("lock").remove(0)
    }
}

#[derive(Default)]
struct RecordingSink {
    events: StdMutex<Vec<String>>,
}

#[async_trait::async_trait]
impl HuntSink for RecordingSink {
    async fn emit_started(&self, _session_id: &SessionId, _execution_id: &HuntExecutionId) {
        self.events.lock().expect("lock").push("started".to_string());
    }
    async fn emit_step_started(&self, _session_id: &SessionId, _execution_id: &HuntExecutionId, step_id: &str) {
        self.events.lock().expect("lock").push(format!("step_started:{step_id}"));
    }
    async fn emit_observation(&self, _session_id: &SessionId, _execution_id: &HuntExecutionId, _observation: &Observation) {
        self.events.lock().expect("lock").push("observation".to_string());
    }
    async fn emit_step_completed(&self, _session_id: &SessionId, _execution_id: &HuntExecutionId, step_id: &str) {
        self.events.lock().expect("lock").push(format!("step_completed:{step_id}"));
    }
    async fn emit_completed(&self, _session_id: &SessionId, _execution_id: &HuntExecutionId, findings_count: usize) {
        self.events.lock().expect("lock").push(format!("completed:{findings_count}"));
    }
    async fn emit_cancelled(&self, _session_id: &SessionId, _execution_id: &HuntExecutionId) {
        self.events.lock().expect("lock").push("cancelled".to_string());
    }
    async fn emit_failed(&self, _session_id: &SessionId, _execution_id: &HuntExecutionId, _error: &str) {
        self.events.lock().expect("lock").push("failed".to_string());
    }
}

fn clock() -> FakeClock {
    FakeClock::new(DateTime::parse_from_rfc3339("2026-01-01T00:00:00Z").unwrap().with_timezone(&Utc))
}

fn sample_module() -> HuntModule {
    HuntModule {
        id: HuntModuleId::new("mod-1"),
        name: "sample".to_string(),
        description: "sample module".to_string(),
        os_types: vec![OsTag::Linux],
        tags: vec![],
        severity_hint: Severity::Medium,
        steps: vec![
            HuntStep {
                id: HuntStepId::new("step-1"),
                description: "list files".to_string(),
                command: "ls -la /etc".to_string(),
                timeout_seconds: 30,
                requires_sudo: false,
            },
            HuntStep {
                id: HuntStepId::new("step-2"),
                description: "check procs".to_string(),
                command: "ps aux".to_string(),
                timeout_seconds: 30,
                requires_sudo: false,
            },
        ],
    }
}

fn sudo_ctx() -> SudoContext {
    SudoContext {
        method: SudoMethod::None,
        ssh_password: None,
        custom_sudo_password: None,
        username: "root".to_string(),
    }
}

#[tokio::test]
async fn run_hunt_completes_all_steps_and_emits_in_order() {
    let clock = clock();
    let module = sample_module();
    let execution = new_pending_execution(&clock, HuntExecutionId::new("hunt-1"), SessionId::new("sess-1"), &module);
    let runner = FakeRunner::new(vec![
        Ok(ExecOutput { stdout: "etc listing".to_string(), stderr: String::new(), exit_code: 0 }),
        Ok(ExecOutput { stdout: "proc listing".to_string(), stderr: String::new(), exit_code: 0 }),
    ]);
    let sink = RecordingSink::default();
    let cancel = CancelFlag::new();

    let result = run_hunt(&clock, &runner, &module, execution, &sudo_ctx(), &cancel, &sink, None).await;

    assert_eq!(result.state, HuntState::Completed);
    assert_eq!(result.observations.len(), 2);
    let events = sink.events.lock().expect("lock").clone();
    assert_eq!(
        events,
        vec![
            "started",
            "step_started:step-1",
            "observation",
            "step_completed:step-1",
            "step_started:step-2",
            "observation",
            "step_completed:step-2",
            "completed:0",
        ]
    );
}

#[tokio::test]
async fn run_hunt_truncates_oversized_output() {
    let clock = clock();
    let module = HuntModule {
        steps: vec![sample_module().steps[0].clone()],
        ..sample_module()
    };
    let execution = new_pending_execution(&clock, HuntExecutionId::new("hunt-2"), SessionId::new("sess-1"), &module);
    let oversized = "a".repeat(40 * 1024);
    let runner = FakeRunner::new(vec![Ok(ExecOutput { stdout: oversized, stderr: String::new(), exit_code: 0 })]);
    let sink = RecordingSink::default();
    let cancel = CancelFlag::new();

    let result = run_hunt(&clock, &runner, &module, execution, &sudo_ctx(), &cancel, &sink, None).await;

    assert!(result.observations[0].truncated);
    assert_eq!(result.observations[0].stdout.len(), 32 * 1024);
}

#[tokio::test]
async fn run_hunt_stops_at_cancel_boundary() {
    let clock = clock();
    let module = sample_module();
    let execution = new_pending_execution(&clock, HuntExecutionId::new("hunt-3"), SessionId::new("sess-1"), &module);
    let runner = FakeRunner::new(vec![]);
    let sink = RecordingSink::default();
    let cancel = CancelFlag::new();
    cancel.cancel();

    let result = run_hunt(&clock, &runner, &module, execution, &sudo_ctx(), &cancel, &sink, None).await;

    assert_eq!(result.state, HuntState::Cancelled);
    assert!(result.observations.is_empty());
}

#[tokio::test]
async fn run_hunt_fails_on_transport_error() {
    let clock = clock();
    let module = HuntModule {
        steps: vec![sample_module().steps[0].clone()],
        ..sample_module()
    };
    let execution = new_pending_execution(&clock, HuntExecutionId::new("hunt-4"), SessionId::new("sess-1"), &module);
    let runner = FakeRunner::new(vec![Err(ShellError::ActorGone)]);
    let sink = RecordingSink::default();
    let cancel = CancelFlag::new();

    let result = run_hunt(&clock, &runner, &module, execution, &sudo_ctx(), &cancel, &sink, None).await;

    assert_eq!(result.state, HuntState::Failed);
}

#[test]
fn resolve_module_errors_on_unknown_id() {
    let modules = vec![sample_module()];
    let result = resolve_module(&modules, "does-not-exist");
    assert!(matches!(result, Err(HuntError::ModuleNotFound(_))));
}
