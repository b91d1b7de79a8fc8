// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HuntExecution: one run of a hunt module against a session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hunt_module::HuntModuleId;
use crate::hunt_module::HuntStepId;
use crate::session::SessionId;

crate::define_id! {
    pub struct HuntExecutionId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HuntState {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl HuntState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

/// The outcome of one hunt step, truncated per spec §4.4 (32 KB stdout,
/// 8 KB stderr) before being appended to the execution's observation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub step_id: HuntStepId,
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub truncated: bool,
}

pub const STDOUT_TRUNCATE_BYTES: usize = 32 * 1024;
pub const STDERR_TRUNCATE_BYTES: usize = 8 * 1024;

/// Truncates `s` to at most `limit` bytes on a UTF-8 char boundary, returning
/// the (possibly shortened) string and whether truncation occurred.
pub fn truncate_utf8(s: &str, limit: usize) -> (String, bool) {
    if s.len() <= limit {
        return (s.to_string(), false);
    }
    let mut end = limit;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    (s[..end].to_string(), true)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntExecution {
    pub id: HuntExecutionId,
    pub session_id: SessionId,
    pub module_id: HuntModuleId,
    pub state: HuntState,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub observations: Vec<Observation>,
    pub ai_report_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_utf8_under_limit_is_untouched() {
        let (s, truncated) = truncate_utf8("hello", 100);
        assert_eq!(s, "hello");
        assert!(!truncated);
    }

    #[test]
    fn truncate_utf8_respects_char_boundary() {
        let input = "a".repeat(10) + "é"; // 'é' is 2 bytes in UTF-8
        let (s, truncated) = truncate_utf8(&input, 11);
        assert!(truncated);
        assert!(s.is_char_boundary(s.len()));
        assert_eq!(s, "a".repeat(10));
    }
}
