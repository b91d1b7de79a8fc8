// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Finding: a deduplicated threat artefact. Content-hash computation and
//! upsert semantics live in the engine crate's deduplicator; this module
//! only owns the persisted shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::asset::AssetId;
use crate::hunt_execution::HuntExecutionId;
use crate::session::SessionId;

crate::define_id! {
    pub struct FindingId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Enum/string coercion per the design notes: accept the string, fall
    /// back to `Medium` on anything unrecognised, never panic.
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "critical" => Self::Critical,
            "high" => Self::High,
            "low" => Self::Low,
            "info" | "informational" => Self::Info,
            _ => Self::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
        }
    }

    /// Severity-dependent confidence floor applied by the AI pipeline's
    /// confidence normaliser (spec §4.5).
    pub fn confidence_floor(&self) -> f64 {
        match self {
            Self::Critical => 0.80,
            Self::High => 0.65,
            Self::Medium => 0.45,
            Self::Low => 0.25,
            Self::Info => 0.10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    Open,
    Acknowledged,
    Resolved,
}

impl FindingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Acknowledged => "acknowledged",
            Self::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: FindingId,
    pub session_id: SessionId,
    pub asset_id: AssetId,
    pub hunt_execution_id: HuntExecutionId,
    pub title: String,
    pub severity: Severity,
    pub confidence: f64,
    pub content_hash: String,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub sighting_count: u32,
    pub stix_bundle: Value,
    pub remediation: Value,
    pub status: FindingStatus,
}

/// Clamps a raw confidence value into `[0, 1]`, as required by the boundary
/// tests in spec §8 (`-0.1` clamps to 0, `150` normalises to 1.0 upstream of
/// this clamp by the caller dividing by 100 first).
pub fn clamp_confidence(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parse_lossy_defaults_to_medium() {
        assert_eq!(Severity::parse_lossy("HIGH"), Severity::High);
        assert_eq!(Severity::parse_lossy("nonsense"), Severity::Medium);
    }

    #[test]
    fn clamp_confidence_boundaries() {
        assert_eq!(clamp_confidence(-0.1), 0.0);
        assert_eq!(clamp_confidence(1.5), 1.0);
        assert_eq!(clamp_confidence(0.0), 0.0);
    }
}
