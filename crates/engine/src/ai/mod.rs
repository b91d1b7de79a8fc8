// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! AI streaming pipeline (§4.5): prompt construction, reasoning-state
//! tracking, result extraction, confidence normalisation, and the
//! top-level pipeline that wires them to a streaming provider.

pub mod confidence;
pub mod extraction;
pub mod pipeline;
pub mod prompt;
pub mod reasoning;

pub use extraction::RawFinding;
pub use pipeline::{run_ai_pipeline, AiPipelineError, AiPipelineOutcome, AiSink};
pub use reasoning::{ReasoningState, ReasoningStateTracker};
