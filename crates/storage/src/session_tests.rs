// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn row_conversion_defaults_unrecognised_state_to_terminated() {
    let row = SessionRow {
        id: "sess-1".to_string(),
        asset_id: "asset-1".to_string(),
        analyst_id: "user-1".to_string(),
        state: "nonsense".to_string(),
        mode: "ai".to_string(),
        locked_by: None,
        created_at: Utc::now(),
    };
    let session: Session = row.into();
    assert_eq!(session.state, SessionState::Terminated);
    assert_eq!(session.mode, SessionMode::Ai);
}

#[test]
fn row_conversion_preserves_locked_by() {
    let row = SessionRow {
        id: "sess-2".to_string(),
        asset_id: "asset-1".to_string(),
        analyst_id: "user-1".to_string(),
        state: "locked".to_string(),
        mode: "interactive".to_string(),
        locked_by: Some("user-2".to_string()),
        created_at: Utc::now(),
    };
    let session: Session = row.into();
    assert_eq!(session.locked_by.map(|u| u.as_str().to_string()), Some("user-2".to_string()));
}
