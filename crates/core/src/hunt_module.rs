// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HuntModule: a declarative probe template loaded from a markdown file on
//! disk. Parsing lives in the `warden-hunt` crate; this crate only owns the
//! in-memory shape, since engine/daemon both need it without depending on
//! the parser.

use serde::{Deserialize, Serialize};

use crate::asset::OsTag;
use crate::finding::Severity;

crate::define_id! {
    pub struct HuntModuleId;
}

crate::define_id! {
    pub struct HuntStepId;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntStep {
    pub id: HuntStepId,
    pub description: String,
    pub command: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub requires_sudo: bool,
}

fn default_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntModule {
    pub id: HuntModuleId,
    pub name: String,
    pub description: String,
    pub os_types: Vec<OsTag>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub severity_hint: Severity,
    pub steps: Vec<HuntStep>,
}

impl HuntModule {
    pub fn applies_to(&self, os: OsTag) -> bool {
        self.os_types.is_empty() || self.os_types.contains(&os)
    }
}
