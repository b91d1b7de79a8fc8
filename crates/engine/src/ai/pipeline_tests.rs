// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Mutex;

use warden_core::SessionId;

use super::*;

struct FakeProvider {
    chunks: Mutex<Option<Vec<Result<String, ProviderError>>>>,
}

impl FakeProvider {
    fn new(chunks: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            chunks: Mutex::new(Some(chunks)),
        }
    }
}

#[async_trait::async_trait]
impl StreamingProvider for FakeProvider {
    async fn stream(&self, _system_prompt: &str, _user_prompt: &str) -> Result<warden_adapters::TokenStream, ProviderError> {
        let chunks = self.chunks.lock().unwrap().take().expect("stream() called more than once");
        Ok(Box::pin(tokio_stream::iter(chunks)))
    }
}

struct FailingProvider;

#[async_trait::async_trait]
impl StreamingProvider for FailingProvider {
    async fn stream(&self, _system_prompt: &str, _user_prompt: &str) -> Result<warden_adapters::TokenStream, ProviderError> {
        Err(ProviderError::ErrorBody("rate limited".to_string()))
    }
}

#[derive(Default)]
struct RecordingSink {
    chunks: Mutex<Vec<(String, String)>>,
    findings: Mutex<Vec<(Severity, String)>>,
    errors: Mutex<Vec<(bool, String)>>,
}

#[async_trait::async_trait]
impl AiSink for RecordingSink {
    async fn emit_reasoning_chunk(&self, _session_id: &SessionId, chunk: &str, state: &str) {
        self.chunks.lock().unwrap().push((chunk.to_string(), state.to_string()));
    }

    async fn emit_finding_generated(&self, _session_id: &SessionId, severity: Severity, title: &str) {
        self.findings.lock().unwrap().push((severity, title.to_string()));
    }

    async fn emit_error(&self, _session_id: &SessionId, retryable: bool, message: &str) {
        self.errors.lock().unwrap().push((retryable, message.to_string()));
    }
}

fn session_id() -> SessionId {
    SessionId::new("sess-1")
}

#[tokio::test]
async fn assembles_stream_and_extracts_findings() {
    let provider = FakeProvider::new(vec![
        Ok("Reviewing the cron output.\n\n".to_string()),
        Ok("```json\n{\"findings\":[{\"title\":\"Suspicious cron\",\"severity\":\"high\",\"confidence\":0.9}]}\n```".to_string()),
    ]);
    let sink = RecordingSink::default();
    let outcome = run_ai_pipeline(&provider, &session_id(), "system", "user", &sink).await.unwrap();

    assert_eq!(outcome.findings.len(), 1);
    assert_eq!(outcome.findings[0].title, "Suspicious cron");
    assert!(outcome.report_text.contains("Suspicious cron"));
    assert_eq!(sink.findings.lock().unwrap().len(), 1);
    assert_eq!(sink.findings.lock().unwrap()[0].0, Severity::High);
}

#[tokio::test]
async fn flushes_residual_chunk_when_stream_ends() {
    let provider = FakeProvider::new(vec![Ok("no findings here".to_string())]);
    let sink = RecordingSink::default();
    let outcome = run_ai_pipeline(&provider, &session_id(), "system", "user", &sink).await.unwrap();

    assert!(outcome.findings.is_empty());
    let chunks = sink.chunks.lock().unwrap();
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].0, "no findings here");
}

#[tokio::test]
async fn applies_confidence_floor_to_low_confidence_critical_finding() {
    let provider = FakeProvider::new(vec![Ok(
        "```json\n{\"findings\":[{\"title\":\"Rootkit\",\"severity\":\"critical\",\"confidence\":0.1}]}\n```".to_string(),
    )]);
    let sink = RecordingSink::default();
    let outcome = run_ai_pipeline(&provider, &session_id(), "system", "user", &sink).await.unwrap();

    assert_eq!(outcome.findings[0].confidence, 0.80);
}

#[tokio::test]
async fn emits_error_and_returns_err_when_provider_rejects_the_request() {
    let provider = FailingProvider;
    let sink = RecordingSink::default();
    let result = run_ai_pipeline(&provider, &session_id(), "system", "user", &sink).await;

    assert!(result.is_err());
    let errors = sink.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(!errors[0].0, "an error-body response should not be marked retryable");
}

#[tokio::test]
async fn emits_error_on_mid_stream_failure() {
    let provider = FakeProvider::new(vec![
        Ok("partial output".to_string()),
        Err(ProviderError::Framing("truncated SSE frame".to_string())),
    ]);
    let sink = RecordingSink::default();
    let result = run_ai_pipeline(&provider, &session_id(), "system", "user", &sink).await;

    assert!(result.is_err());
    let errors = sink.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].0, "a framing error mid-stream should be marked retryable");
}
