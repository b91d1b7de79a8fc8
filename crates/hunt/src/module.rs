// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hunt-module file format: UTF-8 Markdown with YAML front matter, parsed
//! into [`warden_core::HuntModule`]. Front matter carries module metadata;
//! the body's `### <step_id>` sections each carry a `**key**: value` block
//! describing one step.

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use warden_core::{HuntModule, HuntModuleId, HuntStep, HuntStepId, OsTag, Severity};

const DEFAULT_STEP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ModuleParseError {
    #[error("missing YAML front matter (file must start with `---`)")]
    MissingFrontMatter,
    #[error("unterminated YAML front matter (no closing `---`)")]
    UnterminatedFrontMatter,
    #[error("invalid YAML front matter: {0}")]
    InvalidFrontMatter(#[from] serde_yaml::Error),
    #[error("step `{0}` is missing a `command` field")]
    MissingCommand(String),
}

#[derive(Debug, Deserialize)]
struct FrontMatter {
    id: String,
    name: String,
    description: String,
    #[serde(default)]
    os_types: Vec<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    severity_hint: Option<String>,
}

/// Parses a full hunt-module file (front matter + Markdown body).
pub fn parse_module(source: &str) -> Result<HuntModule, ModuleParseError> {
    let (front_matter, body) = split_front_matter(source)?;
    let front_matter: FrontMatter = serde_yaml::from_str(front_matter)?;
    let steps = parse_steps(body)?;

    Ok(HuntModule {
        id: HuntModuleId::new(front_matter.id),
        name: front_matter.name,
        description: front_matter.description,
        os_types: front_matter
            .os_types
            .iter()
            .map(|s| OsTag::parse_lossy(s))
            .collect(),
        tags: front_matter.tags,
        severity_hint: front_matter
            .severity_hint
            .as_deref()
            .map(Severity::parse_lossy)
            .unwrap_or(Severity::Medium),
        steps,
    })
}

fn split_front_matter(source: &str) -> Result<(&str, &str), ModuleParseError> {
    let source = source.strip_prefix('\n').unwrap_or(source);
    let rest = source
        .strip_prefix("---")
        .ok_or(ModuleParseError::MissingFrontMatter)?;
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let end = rest
        .find("\n---")
        .ok_or(ModuleParseError::UnterminatedFrontMatter)?;
    let front_matter = &rest[..end];
    let body = &rest[end + 4..];
    let body = body.strip_prefix('\n').unwrap_or(body);
    Ok((front_matter, body))
}

fn parse_steps(body: &str) -> Result<Vec<HuntStep>, ModuleParseError> {
    let mut steps = Vec::new();
    let mut current_id: Option<String> = None;
    let mut current_fields: BTreeMap<String, String> = BTreeMap::new();

    for line in body.lines() {
        if let Some(step_id) = line.trim_start().strip_prefix("### ") {
            if let Some(id) = current_id.take() {
                steps.push(build_step(id, std::mem::take(&mut current_fields))?);
            }
            current_id = Some(step_id.trim().to_string());
            continue;
        }
        if let Some((key, value)) = parse_field_line(line) {
            current_fields.insert(key, value);
        }
    }
    if let Some(id) = current_id.take() {
        steps.push(build_step(id, current_fields)?);
    }
    Ok(steps)
}

fn parse_field_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    let rest = line.strip_prefix("**")?;
    let (key, rest) = rest.split_once("**:")?;
    Some((key.trim().to_string(), rest.trim().trim_matches('`').to_string()))
}

fn build_step(
    id: String,
    fields: BTreeMap<String, String>,
) -> Result<HuntStep, ModuleParseError> {
    let command = fields
        .get("command")
        .cloned()
        .ok_or_else(|| ModuleParseError::MissingCommand(id.clone()))?;
    let timeout_secs = fields
        .get("timeout")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_STEP_TIMEOUT_SECS);
    let requires_sudo = fields
        .get("requires_sudo")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    Ok(HuntStep {
        id: HuntStepId::new(id),
        description: fields.get("description").cloned().unwrap_or_default(),
        command,
        timeout_seconds: timeout_secs,
        requires_sudo,
    })
}

#[cfg(test)]
#[path = "module_tests.rs"]
mod tests;
