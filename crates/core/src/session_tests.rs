// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    initializing_to_connecting = { SessionState::Initializing, SessionState::Connecting, true },
    connecting_to_connected = { SessionState::Connecting, SessionState::Connected, true },
    connecting_to_failed = { SessionState::Connecting, SessionState::Failed, true },
    connected_to_running = { SessionState::Connected, SessionState::Running, true },
    connected_to_failed_is_rejected = { SessionState::Connected, SessionState::Failed, false },
    running_to_paused = { SessionState::Running, SessionState::Paused, true },
    running_to_locked = { SessionState::Running, SessionState::Locked, true },
    running_to_disconnected = { SessionState::Running, SessionState::Disconnected, true },
    paused_to_running = { SessionState::Paused, SessionState::Running, true },
    locked_to_running = { SessionState::Locked, SessionState::Running, true },
    disconnected_to_connecting = { SessionState::Disconnected, SessionState::Connecting, true },
    failed_to_running_is_rejected = { SessionState::Failed, SessionState::Running, false },
    terminated_to_running_is_rejected = { SessionState::Terminated, SessionState::Running, false },
    any_nonterminal_to_terminated = { SessionState::Running, SessionState::Terminated, true },
    initializing_to_running_is_rejected = { SessionState::Initializing, SessionState::Running, false },
)]
fn transition_table(from: SessionState, to: SessionState, expected_ok: bool) {
    assert_eq!(from.validate_transition(to).is_ok(), expected_ok);
}

#[test]
fn rejected_transition_does_not_modify_state() {
    let mut session = Session::new(
        SessionId::new("s1"),
        AssetId::new("a1"),
        UserId::new("u1"),
        chrono::Utc::now(),
    );
    session.state = SessionState::Failed;
    let err = session.transition(SessionState::Running).unwrap_err();
    assert_eq!(
        err,
        SessionError::InvalidTransition {
            from: SessionState::Failed,
            to: SessionState::Running,
        }
    );
    assert_eq!(session.state, SessionState::Failed);
}

#[test]
fn terminated_and_failed_have_no_outgoing_transitions_except_self_check() {
    for state in [SessionState::Failed, SessionState::Terminated] {
        assert!(state.is_terminal());
        assert!(state.validate_transition(SessionState::Connecting).is_err());
    }
}
