// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event: everything the event bus (§4.6) fans out to subscriber rooms.
//!
//! Serializes with `{"type": "domain.name", ...fields}`, mirroring the
//! tagged-enum convention used throughout this workspace for wire events.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::asset::AssetId;
use crate::finding::Severity;
use crate::hunt_execution::HuntExecutionId;
use crate::session::SessionId;
use crate::session::SessionState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "session.created")]
    SessionCreated {
        session_id: SessionId,
        asset_id: AssetId,
    },
    #[serde(rename = "session.state_changed")]
    SessionStateChanged {
        session_id: SessionId,
        from: SessionState,
        to: SessionState,
        reason: String,
    },
    #[serde(rename = "session.terminated")]
    SessionTerminated { session_id: SessionId },

    #[serde(rename = "ssh.connecting")]
    SshConnecting { session_id: SessionId },
    #[serde(rename = "ssh.connected")]
    SshConnected {
        session_id: SessionId,
        fingerprint: String,
    },
    #[serde(rename = "ssh.error")]
    SshError {
        session_id: SessionId,
        code: String,
        message: String,
    },
    #[serde(rename = "ssh.disconnected")]
    SshDisconnected { session_id: SessionId },
    #[serde(rename = "ssh.command_started")]
    SshCommandStarted {
        session_id: SessionId,
        command_id: String,
        command: String,
    },
    #[serde(rename = "ssh.command_output")]
    SshCommandOutput {
        session_id: SessionId,
        command_id: String,
        chunk: String,
    },
    #[serde(rename = "ssh.command_completed")]
    SshCommandCompleted {
        session_id: SessionId,
        command_id: String,
        exit_code: i32,
    },

    #[serde(rename = "terminal.data")]
    TerminalData {
        session_id: SessionId,
        /// base64-encoded raw PTY bytes (§4.5a).
        data: String,
    },

    #[serde(rename = "hunt.started")]
    HuntStarted {
        session_id: SessionId,
        hunt_execution_id: HuntExecutionId,
    },
    #[serde(rename = "hunt.step_started")]
    HuntStepStarted {
        session_id: SessionId,
        hunt_execution_id: HuntExecutionId,
        step_id: String,
    },
    #[serde(rename = "hunt.observation")]
    HuntObservation {
        session_id: SessionId,
        hunt_execution_id: HuntExecutionId,
        step_id: String,
        exit_code: i32,
        truncated: bool,
    },
    #[serde(rename = "hunt.step_completed")]
    HuntStepCompleted {
        session_id: SessionId,
        hunt_execution_id: HuntExecutionId,
        step_id: String,
    },
    #[serde(rename = "hunt.completed")]
    HuntCompleted {
        session_id: SessionId,
        hunt_execution_id: HuntExecutionId,
        findings_count: usize,
    },
    #[serde(rename = "hunt.cancelled")]
    HuntCancelled {
        session_id: SessionId,
        hunt_execution_id: HuntExecutionId,
    },
    #[serde(rename = "hunt.failed")]
    HuntFailed {
        session_id: SessionId,
        hunt_execution_id: HuntExecutionId,
        error: String,
    },

    #[serde(rename = "ai.reasoning_chunk")]
    AiReasoningChunk {
        session_id: SessionId,
        chunk: String,
        state: String,
    },
    #[serde(rename = "ai.finding_generated")]
    AiFindingGenerated {
        session_id: SessionId,
        severity: Severity,
        title: String,
    },
    #[serde(rename = "ai.error")]
    AiError {
        session_id: SessionId,
        retryable: bool,
        message: String,
    },

    #[serde(rename = "finding.generated")]
    FindingGenerated {
        session_id: SessionId,
        asset_id: AssetId,
        title: String,
    },

    #[serde(rename = "mcp.lookup_started")]
    McpLookupStarted {
        session_id: Option<SessionId>,
        provider: String,
        indicator: String,
    },
    #[serde(rename = "mcp.lookup_completed")]
    McpLookupCompleted {
        session_id: Option<SessionId>,
        provider: String,
        result_summary: Value,
    },
    #[serde(rename = "mcp.lookup_failed")]
    McpLookupFailed {
        session_id: Option<SessionId>,
        provider: String,
        error: String,
    },
    #[serde(rename = "mcp.enrichment_applied")]
    McpEnrichmentApplied {
        session_id: Option<SessionId>,
        enrichment_summary: Value,
    },

    #[serde(rename = "system.error")]
    SystemError {
        session_id: Option<SessionId>,
        severity: EventSeverity,
        message: String,
    },
    #[serde(rename = "system.backpressure")]
    SystemBackpressure {
        component: String,
        queue_depth: usize,
        limit: usize,
    },
}

impl Event {
    /// The `session_id` a subscriber room is keyed by, when this event has one.
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            Self::SessionCreated { session_id, .. }
            | Self::SessionStateChanged { session_id, .. }
            | Self::SessionTerminated { session_id }
            | Self::SshConnecting { session_id }
            | Self::SshConnected { session_id, .. }
            | Self::SshError { session_id, .. }
            | Self::SshDisconnected { session_id }
            | Self::SshCommandStarted { session_id, .. }
            | Self::SshCommandOutput { session_id, .. }
            | Self::SshCommandCompleted { session_id, .. }
            | Self::TerminalData { session_id, .. }
            | Self::HuntStarted { session_id, .. }
            | Self::HuntStepStarted { session_id, .. }
            | Self::HuntObservation { session_id, .. }
            | Self::HuntStepCompleted { session_id, .. }
            | Self::HuntCompleted { session_id, .. }
            | Self::HuntCancelled { session_id, .. }
            | Self::HuntFailed { session_id, .. }
            | Self::AiReasoningChunk { session_id, .. }
            | Self::AiFindingGenerated { session_id, .. }
            | Self::AiError { session_id, .. }
            | Self::FindingGenerated { session_id, .. } => Some(session_id),
            Self::McpLookupStarted { session_id, .. }
            | Self::McpLookupCompleted { session_id, .. }
            | Self::McpLookupFailed { session_id, .. }
            | Self::McpEnrichmentApplied { session_id, .. }
            | Self::SystemError { session_id, .. } => session_id.as_ref(),
            Self::SystemBackpressure { .. } => None,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionCreated { .. } => "session.created",
            Self::SessionStateChanged { .. } => "session.state_changed",
            Self::SessionTerminated { .. } => "session.terminated",
            Self::SshConnecting { .. } => "ssh.connecting",
            Self::SshConnected { .. } => "ssh.connected",
            Self::SshError { .. } => "ssh.error",
            Self::SshDisconnected { .. } => "ssh.disconnected",
            Self::SshCommandStarted { .. } => "ssh.command_started",
            Self::SshCommandOutput { .. } => "ssh.command_output",
            Self::SshCommandCompleted { .. } => "ssh.command_completed",
            Self::TerminalData { .. } => "terminal.data",
            Self::HuntStarted { .. } => "hunt.started",
            Self::HuntStepStarted { .. } => "hunt.step_started",
            Self::HuntObservation { .. } => "hunt.observation",
            Self::HuntStepCompleted { .. } => "hunt.step_completed",
            Self::HuntCompleted { .. } => "hunt.completed",
            Self::HuntCancelled { .. } => "hunt.cancelled",
            Self::HuntFailed { .. } => "hunt.failed",
            Self::AiReasoningChunk { .. } => "ai.reasoning_chunk",
            Self::AiFindingGenerated { .. } => "ai.finding_generated",
            Self::AiError { .. } => "ai.error",
            Self::FindingGenerated { .. } => "finding.generated",
            Self::McpLookupStarted { .. } => "mcp.lookup_started",
            Self::McpLookupCompleted { .. } => "mcp.lookup_completed",
            Self::McpLookupFailed { .. } => "mcp.lookup_failed",
            Self::McpEnrichmentApplied { .. } => "mcp.enrichment_applied",
            Self::SystemError { .. } => "system.error",
            Self::SystemBackpressure { .. } => "system.backpressure",
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
