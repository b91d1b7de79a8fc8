// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! STIX bundle builder (§4.9): a pure function of an AI finding. Two builds
//! of the same finding are structurally identical but not byte-identical —
//! object ids are fresh `uuid::Uuid::new_v4()` values each call.

use serde_json::{json, Value};
use uuid::Uuid;

/// Classifies one indicator string into the pattern shape STIX needs,
/// avoiding an `if kind == "ip"` ladder at the call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorPattern {
    IPv4(String),
    Domain(String),
    Hash { algo: &'static str, value: String },
    FilePath(String),
}

impl IndicatorPattern {
    /// Classifies a raw indicator string by shape: dotted-quad for IPv4,
    /// hex length 32/40/64 for MD5/SHA-1/SHA-256, a leading `/` for a file
    /// path, anything else falls back to a domain.
    pub fn classify(indicator: &str) -> Self {
        if indicator.starts_with('/') {
            return Self::FilePath(indicator.to_string());
        }
        if is_ipv4(indicator) {
            return Self::IPv4(indicator.to_string());
        }
        if indicator.chars().all(|c| c.is_ascii_hexdigit()) {
            let algo = match indicator.len() {
                32 => Some("MD5"),
                40 => Some("SHA-1"),
                64 => Some("SHA-256"),
                _ => None,
            };
            if let Some(algo) = algo {
                return Self::Hash {
                    algo,
                    value: indicator.to_string(),
                };
            }
        }
        Self::Domain(indicator.to_string())
    }

    fn stix_pattern(&self) -> String {
        match self {
            Self::IPv4(v) => format!("[ipv4-addr:value = '{v}']"),
            Self::Domain(v) => format!("[domain-name:value = '{v}']"),
            Self::Hash { algo, value } => format!("[file:hashes.{algo} = '{value}']"),
            Self::FilePath(v) => format!("[file:name = '{v}']"),
        }
    }
}

fn is_ipv4(s: &str) -> bool {
    s.split('.').count() == 4 && s.split('.').all(|octet| octet.parse::<u8>().is_ok())
}

/// Builds a STIX bundle from a finding's indicators and MITRE technique
/// ids. The `report` object references every other object by id.
pub fn build_bundle(finding_title: &str, indicators: &[String], technique_ids: &[String]) -> Value {
    let mut objects = Vec::new();
    let mut object_ids = Vec::new();

    let indicator_ids: Vec<String> = indicators
        .iter()
        .map(|indicator| {
            let pattern = IndicatorPattern::classify(indicator);
            let id = format!("indicator--{}", Uuid::new_v4());
            objects.push(json!({
                "type": "indicator",
                "id": id,
                "pattern": pattern.stix_pattern(),
                "pattern_type": "stix",
            }));
            object_ids.push(id.clone());
            id
        })
        .collect();

    let technique_object_ids: Vec<String> = technique_ids
        .iter()
        .map(|technique_id| {
            let id = format!("attack-pattern--{}", Uuid::new_v4());
            objects.push(json!({
                "type": "attack-pattern",
                "id": id,
                "name": technique_id,
                "external_references": [{
                    "source_name": "mitre-attack",
                    "url": format!("https://attack.mitre.org/techniques/{}", technique_id.replace('.', "/")),
                    "external_id": technique_id,
                }],
            }));
            object_ids.push(id.clone());
            id
        })
        .collect();

    for indicator_id in &indicator_ids {
        for technique_id in &technique_object_ids {
            let relationship_id = format!("relationship--{}", Uuid::new_v4());
            objects.push(json!({
                "type": "relationship",
                "id": relationship_id,
                "relationship_type": "indicates",
                "source_ref": indicator_id,
                "target_ref": technique_id,
            }));
            object_ids.push(relationship_id);
        }
    }

    let report_id = format!("report--{}", Uuid::new_v4());
    objects.push(json!({
        "type": "report",
        "id": report_id,
        "name": finding_title,
        "object_refs": object_ids,
    }));

    json!({
        "type": "bundle",
        "id": format!("bundle--{}", Uuid::new_v4()),
        "objects": objects,
    })
}

#[cfg(test)]
#[path = "stix_tests.rs"]
mod tests;
