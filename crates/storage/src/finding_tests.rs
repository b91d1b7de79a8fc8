// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn row_conversion_defaults_unrecognised_status_to_open() {
    let row = FindingRow {
        id: "finding-1".to_string(),
        session_id: "sess-1".to_string(),
        asset_id: "asset-1".to_string(),
        hunt_execution_id: "hunt-1".to_string(),
        title: "suspicious cron entry".to_string(),
        severity: "high".to_string(),
        confidence: 0.7,
        content_hash: "deadbeef".to_string(),
        first_seen: Utc::now(),
        last_seen: Utc::now(),
        sighting_count: 1,
        stix_bundle: serde_json::json!({}),
        remediation: serde_json::json!({}),
        status: "nonsense".to_string(),
    };
    let finding: Finding = row.into();
    assert_eq!(finding.status, FindingStatus::Open);
    assert_eq!(finding.severity, Severity::High);
}

#[test]
fn row_conversion_clamps_negative_sighting_count_to_zero() {
    let row = FindingRow {
        id: "finding-2".to_string(),
        session_id: "sess-1".to_string(),
        asset_id: "asset-1".to_string(),
        hunt_execution_id: "hunt-1".to_string(),
        title: "t".to_string(),
        severity: "low".to_string(),
        confidence: 0.1,
        content_hash: "abc".to_string(),
        first_seen: Utc::now(),
        last_seen: Utc::now(),
        sighting_count: -3,
        stix_bundle: serde_json::json!({}),
        remediation: serde_json::json!({}),
        status: "resolved".to_string(),
    };
    let finding: Finding = row.into();
    assert_eq!(finding.sighting_count, 0);
}
