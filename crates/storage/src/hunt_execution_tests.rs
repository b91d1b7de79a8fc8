// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn row_conversion_defaults_unrecognised_state_to_pending() {
    let row = HuntExecutionRow {
        id: "hunt-1".to_string(),
        session_id: "sess-1".to_string(),
        module_id: "module-1".to_string(),
        state: "nonsense".to_string(),
        started_at: Utc::now(),
        finished_at: None,
        observations: serde_json::json!([]),
        ai_report_text: None,
    };
    let execution: HuntExecution = row.try_into().expect("converts");
    assert_eq!(execution.state, HuntState::Pending);
    assert!(execution.observations.is_empty());
}

#[test]
fn row_conversion_rejects_malformed_observations() {
    let row = HuntExecutionRow {
        id: "hunt-2".to_string(),
        session_id: "sess-1".to_string(),
        module_id: "module-1".to_string(),
        state: "running".to_string(),
        started_at: Utc::now(),
        finished_at: None,
        observations: serde_json::json!({"not": "a list"}),
        ai_report_text: None,
    };
    let result: Result<HuntExecution, _> = row.try_into();
    assert!(result.is_err());
}
