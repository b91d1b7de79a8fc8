// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use super::*;

const SAMPLE: &str = r#"---
id: linux-persistence-check
name: Linux Persistence Check
description: Looks for common persistence mechanisms.
os_types: [linux]
tags: [persistence, linux]
severity_hint: high
---

### list_cron_jobs
**description**: Dump crontabs for all users.
**command**: `crontab -l`
**timeout**: 15
**requires_sudo**: false
"#;

#[test]
fn validate_accepts_a_well_formed_module() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    assert!(validate(file.path(), OutputFormat::Text).is_ok());
}

#[test]
fn validate_reports_parse_errors() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"not a hunt module").unwrap();
    let err = validate(file.path(), OutputFormat::Text).unwrap_err();
    assert!(err.to_string().contains("front matter"));
}
