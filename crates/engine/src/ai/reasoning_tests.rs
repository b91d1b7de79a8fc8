// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn starts_in_analyzing() {
    let tracker = ReasoningStateTracker::new();
    assert_eq!(tracker.current(), ReasoningState::Analyzing);
}

#[test]
fn transitions_to_concluding_on_marker() {
    let mut tracker = ReasoningStateTracker::new();
    let state = tracker.advance("Looking at the evidence... ## Risk Assessment\nsomething");
    assert_eq!(state, ReasoningState::Concluding);
}

#[test]
fn transitions_to_generating_on_json_fence() {
    let mut tracker = ReasoningStateTracker::new();
    tracker.advance("## Key Findings\nsummary text");
    let state = tracker.advance("## Key Findings\nsummary text\n```json\n{");
    assert_eq!(state, ReasoningState::Generating);
}

#[test]
fn never_regresses_even_if_earlier_marker_reappears() {
    let mut tracker = ReasoningStateTracker::new();
    tracker.advance("## Findings");
    tracker.advance("## Findings\n```json\n{\"findings\": []");
    assert_eq!(tracker.current(), ReasoningState::Generating);
    let state = tracker.advance("## Findings\n```json\n{\"findings\": []}\n\nto summarize nothing else");
    assert_eq!(state, ReasoningState::Generating);
}

#[test]
fn stays_analyzing_without_any_marker() {
    let mut tracker = ReasoningStateTracker::new();
    let state = tracker.advance("Still reviewing the command output for anomalies.");
    assert_eq!(state, ReasoningState::Analyzing);
}
