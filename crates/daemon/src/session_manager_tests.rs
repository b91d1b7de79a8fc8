// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use warden_core::{AssetId, FakeClock, UserId};

fn clock_at(iso: &str) -> FakeClock {
    let start = chrono::DateTime::parse_from_rfc3339(iso)
        .expect("valid timestamp")
        .with_timezone(&chrono::Utc);
    FakeClock::new(start)
}

fn new_session(clock: &FakeClock) -> Session {
    Session::new(
        SessionId::new("s1"),
        AssetId::new("asset-1"),
        UserId::new("analyst-1"),
        clock.now(),
    )
}

#[test]
fn register_succeeds_within_capacity() {
    let clock = clock_at("2026-01-01T00:00:00Z");
    let manager = SessionManager::new(clock.clone(), 2);
    assert!(manager.register(new_session(&clock)).is_ok());
    assert_eq!(manager.len(), 1);
}

#[test]
fn register_fails_once_capacity_exhausted() {
    let clock = clock_at("2026-01-01T00:00:00Z");
    let manager = SessionManager::new(clock.clone(), 1);
    manager.register(new_session(&clock)).expect("first registers");

    let mut second = new_session(&clock);
    second.id = SessionId::new("s2");
    let result = manager.register(second);
    assert!(matches!(result, Err(SessionManagerError::CapacityExhausted)));
}

#[test]
fn transition_updates_registered_session() {
    let clock = clock_at("2026-01-01T00:00:00Z");
    let manager = SessionManager::new(clock.clone(), 2);
    manager.register(new_session(&clock)).expect("register");

    let from = manager
        .transition(&SessionId::new("s1"), SessionState::Connecting)
        .expect("valid transition");
    assert_eq!(from, SessionState::Initializing);
    assert_eq!(manager.get(&SessionId::new("s1")).unwrap().state, SessionState::Connecting);
}

#[test]
fn transition_on_unknown_session_errors() {
    let clock = clock_at("2026-01-01T00:00:00Z");
    let manager = SessionManager::new(clock, 2);
    let result = manager.transition(&SessionId::new("missing"), SessionState::Connecting);
    assert!(matches!(result, Err(SessionManagerError::NotFound(_))));
}

#[test]
fn reap_removes_old_disconnected_sessions_and_frees_capacity() {
    let clock = clock_at("2026-01-01T00:00:00Z");
    let manager = SessionManager::new(clock.clone(), 1);
    manager.register(new_session(&clock)).expect("register");

    // Drive to a reapable terminal-ish state.
    manager
        .transition(&SessionId::new("s1"), SessionState::Connecting)
        .unwrap();
    manager
        .transition(&SessionId::new("s1"), SessionState::Connected)
        .unwrap();
    manager
        .transition(&SessionId::new("s1"), SessionState::Running)
        .unwrap();
    manager
        .transition(&SessionId::new("s1"), SessionState::Disconnected)
        .unwrap();

    clock.advance(REAP_AGE + chrono::Duration::minutes(1));
    let reaped = manager.reap();
    assert_eq!(reaped, vec![SessionId::new("s1")]);
    assert!(manager.is_empty());

    // Capacity should be available again.
    let mut fresh = new_session(&clock);
    fresh.id = SessionId::new("s2");
    assert!(manager.register(fresh).is_ok());
}

#[test]
fn reap_leaves_fresh_disconnected_sessions_alone() {
    let clock = clock_at("2026-01-01T00:00:00Z");
    let manager = SessionManager::new(clock.clone(), 2);
    manager.register(new_session(&clock)).expect("register");
    manager
        .transition(&SessionId::new("s1"), SessionState::Connecting)
        .unwrap();

    let reaped = manager.reap();
    assert!(reaped.is_empty());
    assert_eq!(manager.len(), 1);
}
