// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result extraction (§4.5): turns the full assembled AI response into a
//! list of raw finding records, trying the JSON block first and falling
//! back to a Markdown parse.

use regex::Regex;
use serde_json::Value;

use crate::ai::confidence;

/// One finding as extracted from the model's response, before dedup/STIX.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFinding {
    pub title: String,
    pub severity: String,
    pub confidence: f64,
    pub description: String,
    pub technique_ids: Vec<String>,
    pub indicators: Vec<String>,
    pub remediation_steps: Vec<String>,
    pub raw_evidence: String,
}

const MAX_ASSEMBLED_BYTES: usize = 64 * 1024;
const FALLBACK_SKIP_TITLES: &[&str] = &["Executive Summary", "Risk Assessment", "Remediation Summary"];

/// Truncates an assembled response to the 64 KB cap (§4.5 chunk batching).
pub fn truncate_response(text: &str) -> String {
    if text.len() <= MAX_ASSEMBLED_BYTES {
        return text.to_string();
    }
    let mut end = MAX_ASSEMBLED_BYTES;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    text[..end].to_string()
}

/// Extracts findings from the assembled response: JSON-block primary path
/// with repair-on-truncation, Markdown fallback otherwise.
pub fn extract_findings(assembled: &str) -> Vec<RawFinding> {
    if let Some(findings) = extract_from_json_block(assembled) {
        if !findings.is_empty() {
            return findings;
        }
    }
    extract_from_markdown(assembled)
}

fn extract_from_json_block(assembled: &str) -> Option<Vec<RawFinding>> {
    let fence_start = assembled.rfind("```json")?;
    let body_start = fence_start + "```json".len();
    let body = &assembled[body_start..];
    let json_text = match body.find("```") {
        Some(fence_end) => body[..fence_end].to_string(),
        None => repair_json(body.trim()),
    };
    let value: Value = serde_json::from_str(json_text.trim()).ok()?;
    let findings = value.get("findings")?.as_array()?;
    Some(findings.iter().filter_map(parse_json_finding).collect())
}

fn parse_json_finding(value: &Value) -> Option<RawFinding> {
    let title = value.get("title")?.as_str()?.to_string();
    let severity = value
        .get("severity")
        .and_then(Value::as_str)
        .unwrap_or("medium")
        .to_string();
    let confidence = value
        .get("confidence")
        .map(confidence::normalize)
        .unwrap_or(0.5);
    let description = value.get("description").and_then(Value::as_str).unwrap_or_default().to_string();
    let strings = |key: &str| -> Vec<String> {
        value
            .get(key)
            .and_then(Value::as_array)
            .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
            .unwrap_or_default()
    };
    let raw_evidence = value.get("raw_evidence").and_then(Value::as_str).unwrap_or_default().to_string();
    Some(RawFinding {
        title,
        severity,
        confidence,
        description,
        technique_ids: strings("technique_ids"),
        indicators: strings("indicators"),
        remediation_steps: strings("remediation_steps"),
        raw_evidence,
    })
}

/// Repairs a truncated JSON document: closes an unterminated string, strips
/// a trailing comma, and appends balancing `]`/`}` characters.
pub fn repair_json(truncated: &str) -> String {
    let mut text = truncated.to_string();

    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            _ => {}
        }
    }
    if in_string {
        text.push('"');
    }

    let trimmed = text.trim_end();
    let text = if let Some(stripped) = trimmed.strip_suffix(',') {
        stripped.to_string()
    } else {
        trimmed.to_string()
    };

    let mut stack = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    for c in text.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' | '[' if !in_string => stack.push(c),
            '}' if !in_string => {
                if stack.last() == Some(&'{') {
                    stack.pop();
                }
            }
            ']' if !in_string => {
                if stack.last() == Some(&'[') {
                    stack.pop();
                }
            }
            _ => {}
        }
    }

    let mut closer = String::new();
    while let Some(open) = stack.pop() {
        closer.push(if open == '{' { '}' } else { ']' });
    }
    format!("{text}{closer}")
}

fn extract_from_markdown(assembled: &str) -> Vec<RawFinding> {
    let technique_re = Regex::new(r"T\d{4}(?:\.\d{3})?").expect("valid regex");
    let mut findings = Vec::new();

    let with_leading_newline = format!("\n{assembled}");
    let sections: Vec<String> = with_leading_newline.split("\n### ").skip(1).map(str::to_string).collect();
    for section in sections {
        let mut lines = section.lines();
        let title = lines.next().unwrap_or_default().trim().to_string();
        if FALLBACK_SKIP_TITLES.contains(&title.as_str()) {
            continue;
        }
        let body: String = lines.collect::<Vec<_>>().join("\n");

        let severity = field_value(&body, "Severity")
            .map(|v| v.to_ascii_lowercase())
            .filter(|v| ["critical", "high", "medium", "low", "info"].contains(&v.as_str()))
            .unwrap_or_else(|| "medium".to_string());

        let confidence = field_value(&body, "Confidence")
            .map(|v| confidence::normalize(&Value::String(v)))
            .unwrap_or(0.5);

        let description = field_value(&body, "Description").unwrap_or_default();

        let mitre_line = field_value(&body, "MITRE ATT&CK").unwrap_or_default();
        let technique_ids: Vec<String> = technique_re.find_iter(&mitre_line).map(|m| m.as_str().to_string()).collect();

        let remediation = field_value(&body, "Remediation").unwrap_or_default();
        let remediation_steps: Vec<String> = remediation
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        findings.push(RawFinding {
            title,
            severity,
            confidence,
            description,
            technique_ids,
            indicators: Vec::new(),
            remediation_steps,
            raw_evidence: body,
        });
    }

    findings
}

/// Pulls the value out of a `**<label>**: <value>` line.
fn field_value(body: &str, label: &str) -> Option<String> {
    let prefix = format!("**{label}**:");
    body.lines()
        .find_map(|line| line.trim().strip_prefix(&prefix).map(|v| v.trim().to_string()))
}

#[cfg(test)]
#[path = "extraction_tests.rs"]
mod tests;
