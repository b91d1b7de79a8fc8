// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::Serialize;

use super::*;

#[derive(Debug, Clone, Serialize)]
struct FakeEntry {
    name: String,
}

#[test]
fn format_time_ago_zero_is_dash() {
    assert_eq!(format_time_ago(0), "-");
}

#[test]
fn format_time_ago_seconds() {
    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    assert_eq!(format_time_ago(now_ms - 5_000), "5s");
}

#[test]
fn print_json_emits_nothing_in_text_mode() {
    let entry = FakeEntry { name: "a".into() };
    assert!(print_json(OutputFormat::Text, &entry).is_ok());
}

#[test]
fn print_json_emits_pretty_json_in_json_mode() {
    let entry = FakeEntry { name: "a".into() };
    assert!(print_json(OutputFormat::Json, &entry).is_ok());
}
