// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Confidence normalisation (§4.5): maps whatever shape an LLM hands back
//! for a confidence value onto `[0,1]`, then applies a severity-dependent
//! floor.

use serde_json::Value;
use warden_core::{clamp_confidence, Severity};

fn anchor_for(word: &str) -> Option<f64> {
    match word.to_ascii_lowercase().as_str() {
        "critical" => Some(0.95),
        "high" => Some(0.80),
        "medium" => Some(0.60),
        "low" => Some(0.35),
        "info" => Some(0.50),
        "certain" => Some(0.95),
        "likely" => Some(0.70),
        "possible" => Some(0.45),
        "unlikely" => Some(0.20),
        _ => None,
    }
}

/// Normalises a raw JSON confidence value (number, string anchor, or a
/// `"NN%"` string) to `[0,1]`.
pub fn normalize(raw: &Value) -> f64 {
    let value = match raw {
        Value::Number(n) => n.as_f64().unwrap_or(0.5),
        Value::String(s) => {
            if let Some(anchor) = anchor_for(s) {
                anchor
            } else if let Some(pct) = s.trim().strip_suffix('%') {
                pct.trim().parse::<f64>().map(|v| v / 100.0).unwrap_or(0.5)
            } else {
                s.trim().parse::<f64>().unwrap_or(0.5)
            }
        }
        _ => 0.5,
    };
    let value = if value > 1.0 { value / 100.0 } else { value };
    clamp_confidence(value)
}

/// Applies the severity-dependent floor from `Severity::confidence_floor`
/// as `max(floor, normalised)`.
pub fn apply_floor(normalized: f64, severity: Severity) -> f64 {
    normalized.max(severity.confidence_floor())
}

#[cfg(test)]
#[path = "confidence_tests.rs"]
mod tests;
