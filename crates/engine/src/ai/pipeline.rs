// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level AI streaming pipeline (§4.5): drives a `StreamingProvider`,
//! batches reasoning chunks, tracks state, extracts findings once the
//! stream ends, and normalises confidence. AI failures never fail the
//! hunt: the caller decides what `HuntAiHook::analyze` returns when this
//! errors.

use std::time::Duration;

use thiserror::Error;
use tokio_stream::StreamExt;
use tracing::warn;
use warden_adapters::{ProviderError, StreamingProvider};
use warden_core::{clamp_confidence, Severity, SessionId};

use crate::ai::confidence;
use crate::ai::extraction::{self, RawFinding};
use crate::ai::reasoning::ReasoningStateTracker;

/// Minimum interval between `ai.reasoning_chunk` emissions (§4.5).
const CHUNK_BATCH_INTERVAL: Duration = Duration::from_millis(150);

#[derive(Debug, Error)]
pub enum AiPipelineError {
    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Narrow surface the pipeline needs to publish progress, decoupling it
/// from the daemon's event bus.
#[async_trait::async_trait]
pub trait AiSink: Send + Sync {
    async fn emit_reasoning_chunk(&self, session_id: &SessionId, chunk: &str, state: &str);
    async fn emit_finding_generated(&self, session_id: &SessionId, severity: Severity, title: &str);
    async fn emit_error(&self, session_id: &SessionId, retryable: bool, message: &str);
}

pub struct AiPipelineOutcome {
    pub report_text: String,
    pub findings: Vec<RawFinding>,
}

/// Runs one hunt's AI analysis to completion: streams the model's
/// response, batches reasoning chunks to the sink at the §4.5 cadence,
/// and extracts+normalises findings from the assembled text.
pub async fn run_ai_pipeline(
    provider: &dyn StreamingProvider,
    session_id: &SessionId,
    system_prompt: &str,
    user_prompt: &str,
    sink: &dyn AiSink,
) -> Result<AiPipelineOutcome, AiPipelineError> {
    let mut stream = match provider.stream(system_prompt, user_prompt).await {
        Ok(stream) => stream,
        Err(e) => {
            sink.emit_error(session_id, is_retryable(&e), &e.to_string()).await;
            return Err(e.into());
        }
    };

    let mut assembled = String::new();
    let mut pending = String::new();
    let mut tracker = ReasoningStateTracker::new();
    let mut last_flush = tokio::time::Instant::now();

    loop {
        match stream.next().await {
            Some(Ok(token)) => {
                assembled.push_str(&token);
                pending.push_str(&token);

                if assembled.len() > 64 * 1024 {
                    assembled = extraction::truncate_response(&assembled);
                }

                if last_flush.elapsed() >= CHUNK_BATCH_INTERVAL && !pending.is_empty() {
                    let state = tracker.advance(&assembled);
                    sink.emit_reasoning_chunk(session_id, &pending, state.as_str()).await;
                    pending.clear();
                    last_flush = tokio::time::Instant::now();
                }
            }
            Some(Err(e)) => {
                warn!(session_id = %session_id, error = %e, "AI provider stream error");
                sink.emit_error(session_id, is_retryable(&e), &e.to_string()).await;
                return Err(e.into());
            }
            None => break,
        }
    }

    if !pending.is_empty() {
        let state = tracker.advance(&assembled);
        sink.emit_reasoning_chunk(session_id, &pending, state.as_str()).await;
    }

    let raw_findings = extraction::extract_findings(&assembled);
    let findings: Vec<RawFinding> = raw_findings
        .into_iter()
        .map(|mut f| {
            let severity = Severity::parse_lossy(&f.severity);
            f.confidence = confidence::apply_floor(clamp_confidence(f.confidence), severity);
            f
        })
        .collect();

    for finding in &findings {
        let severity = Severity::parse_lossy(&finding.severity);
        sink.emit_finding_generated(session_id, severity, &finding.title).await;
    }

    Ok(AiPipelineOutcome {
        report_text: assembled,
        findings,
    })
}

/// Network/framing failures are transient and worth a retry upstream;
/// an error body from the provider almost always indicates a bad request
/// that would fail again identically (§7 open question: never auto-retried
/// regardless of this flag, it's advisory for the analyst).
fn is_retryable(e: &ProviderError) -> bool {
    !matches!(e, ProviderError::ErrorBody(_))
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
