// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn extracts_findings_from_well_formed_json_block() {
    let assembled = "Looking at the evidence.\n\n```json\n{\"summary\":\"x\",\"findings\":[{\"title\":\"Suspicious cron entry\",\"severity\":\"high\",\"confidence\":0.8}]}\n```\n";
    let findings = extract_findings(assembled);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].title, "Suspicious cron entry");
    assert_eq!(findings[0].severity, "high");
}

#[test]
fn repairs_truncated_json_block_and_extracts_first_finding() {
    let assembled = "...```json\n{\"summary\":\"x\",\"findings\":[{\"title\":\"A\",\"severity\":\"high\"";
    let findings = extract_findings(assembled);
    assert_eq!(findings[0].title, "A");
    assert_eq!(findings[0].severity, "high");
}

#[test]
fn repair_json_closes_string_strips_comma_and_balances_brackets() {
    let repaired = repair_json("{\"a\": [1, 2,");
    let parsed: serde_json::Value = serde_json::from_str(&repaired).expect("repaired JSON should parse");
    assert_eq!(parsed["a"], serde_json::json!([1, 2]));
}

#[test]
fn falls_back_to_markdown_when_no_json_fence_present() {
    let assembled = "\
### Unusual outbound connection
**Severity**: critical
**Confidence**: 90%
**Description**: Host beaconed to a rare external IP.
**MITRE ATT&CK**: T1071.001
**Remediation**: Block the IP; Rotate credentials

### Executive Summary
Nothing to skip here.
";
    let findings = extract_from_markdown(assembled);
    assert_eq!(findings.len(), 1);
    assert_eq!(findings[0].title, "Unusual outbound connection");
    assert_eq!(findings[0].severity, "critical");
    assert_eq!(findings[0].confidence, 0.9);
    assert_eq!(findings[0].technique_ids, vec!["T1071.001".to_string()]);
    assert_eq!(
        findings[0].remediation_steps,
        vec!["Block the IP".to_string(), "Rotate credentials".to_string()]
    );
}

#[test]
fn markdown_fallback_defaults_severity_and_confidence_when_missing() {
    let assembled = "### Odd process tree\nNo structured fields here.\n";
    let findings = extract_from_markdown(assembled);
    assert_eq!(findings[0].severity, "medium");
    assert_eq!(findings[0].confidence, 0.5);
}

#[test]
fn truncate_response_respects_byte_cap_and_char_boundaries() {
    let huge = "a".repeat(70 * 1024);
    let truncated = truncate_response(&huge);
    assert_eq!(truncated.len(), 64 * 1024);
}

#[test]
fn truncate_response_leaves_short_text_untouched() {
    assert_eq!(truncate_response("short"), "short");
}
