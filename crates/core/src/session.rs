// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session identity, state machine, and the persisted shape of a live
//! analyst<->asset binding.
//!
//! The transient runtime handles a session owns in memory (command lock, AI
//! lock, mode mutex, remote-shell handle) are not part of this type — they
//! live alongside the registry in the daemon crate, since this crate is the
//! synchronous domain-model layer and has no opinion on the async runtime.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::asset::AssetId;
use crate::user::UserId;

crate::define_id! {
    /// Unique identifier for a live analyst<->asset session.
    pub struct SessionId;
}

/// States of the session finite-state machine. `Failed` and `Terminated`
/// are the only terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Initializing,
    Connecting,
    Connected,
    Running,
    Paused,
    Locked,
    Disconnected,
    Failed,
    Terminated,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Failed | Self::Terminated)
    }

    pub fn parse_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "initializing" => Self::Initializing,
            "connecting" => Self::Connecting,
            "connected" => Self::Connected,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "locked" => Self::Locked,
            "disconnected" => Self::Disconnected,
            "failed" => Self::Failed,
            _ => Self::Terminated,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Locked => "locked",
            Self::Disconnected => "disconnected",
            Self::Failed => "failed",
            Self::Terminated => "terminated",
        }
    }

    /// Validates `self -> to` against the transition table. Destroy (any
    /// non-terminal state -> Terminated) is always legal and is checked
    /// first since it isn't listed per-row in the table.
    pub fn validate_transition(self, to: SessionState) -> Result<(), SessionError> {
        if self.is_terminal() {
            return Err(SessionError::InvalidTransition { from: self, to });
        }
        if to == Self::Terminated {
            return Ok(());
        }
        let allowed: &[SessionState] = match self {
            Self::Initializing => &[Self::Connecting],
            Self::Connecting => &[Self::Connected, Self::Failed],
            Self::Connected => &[Self::Running],
            Self::Running => &[Self::Paused, Self::Locked, Self::Disconnected],
            Self::Paused => &[Self::Running, Self::Disconnected],
            Self::Locked => &[Self::Running, Self::Disconnected],
            Self::Disconnected => &[Self::Connecting],
            Self::Failed | Self::Terminated => &[],
        };
        if allowed.contains(&to) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition { from: self, to })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    Ai,
    Interactive,
}

impl SessionMode {
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "interactive" => Self::Interactive,
            _ => Self::Ai,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ai => "ai",
            Self::Interactive => "interactive",
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },
    #[error("session capacity exhausted")]
    CapacityExhausted,
}

/// Persisted shape of a session row. Runtime handles are owned separately
/// by the session manager in the daemon crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub asset_id: AssetId,
    pub analyst_id: UserId,
    pub state: SessionState,
    pub mode: SessionMode,
    pub locked_by: Option<UserId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Session {
    pub fn new(
        id: SessionId,
        asset_id: AssetId,
        analyst_id: UserId,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            id,
            asset_id,
            analyst_id,
            state: SessionState::Initializing,
            mode: SessionMode::Ai,
            locked_by: None,
            created_at: now,
        }
    }

    /// Validates and applies a transition in place, returning the prior state.
    pub fn transition(&mut self, to: SessionState) -> Result<SessionState, SessionError> {
        self.state.validate_transition(to)?;
        let from = self.state;
        self.state = to;
        Ok(from)
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
