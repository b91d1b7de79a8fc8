// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remediation structurer (§4.9): a pure function classifying an AI
//! finding's remediation steps into immediate/short-term/long-term
//! buckets by keyword.

use serde_json::{json, Value};
use warden_core::Severity;

const IMMEDIATE_KEYWORDS: &[&str] = &["remove", "delete", "kill", "disable", "revoke", "block", "stop"];
const LONG_TERM_KEYWORDS: &[&str] = &["implement", "deploy", "configure", "monitor", "audit"];

enum Bucket {
    Immediate,
    ShortTerm,
    LongTerm,
}

fn classify(step: &str) -> Bucket {
    let lowered = step.to_ascii_lowercase();
    if IMMEDIATE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Bucket::Immediate
    } else if LONG_TERM_KEYWORDS.iter().any(|k| lowered.contains(k)) {
        Bucket::LongTerm
    } else {
        Bucket::ShortTerm
    }
}

/// Buckets `steps` by keyword and carries the raw list, technique
/// references, and severity alongside for the UI to render without a
/// second round trip.
pub fn structure(steps: &[String], technique_ids: &[String], severity: Severity) -> Value {
    let mut immediate = Vec::new();
    let mut short_term = Vec::new();
    let mut long_term = Vec::new();

    for step in steps {
        match classify(step) {
            Bucket::Immediate => immediate.push(step.clone()),
            Bucket::ShortTerm => short_term.push(step.clone()),
            Bucket::LongTerm => long_term.push(step.clone()),
        }
    }

    json!({
        "immediate_actions": immediate,
        "short_term_actions": short_term,
        "long_term_actions": long_term,
        "raw_steps": steps,
        "technique_ids": technique_ids,
        "severity": severity.as_str(),
    })
}

#[cfg(test)]
#[path = "remediation_tests.rs"]
mod tests;
