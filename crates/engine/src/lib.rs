// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Hunt execution engine: steps a module against a remote shell, streams
//! observations to the AI pipeline, deduplicates findings, and builds
//! their STIX/remediation artefacts (§4.4, §4.5, §4.7, §4.8, §4.9).

pub mod ai;
pub mod dedup;
pub mod enrichment_orchestrator;
pub mod hunt_orchestrator;
pub mod remediation;
pub mod stix;

pub use dedup::content_hash;
pub use enrichment_orchestrator::{enrich, EnrichmentSink};
pub use hunt_orchestrator::{
    new_pending_execution, resolve_module, run_hunt, CancelFlag, CommandRunner, HuntAiHook, HuntError,
    HuntSink, SudoContext,
};
pub use stix::IndicatorPattern;
