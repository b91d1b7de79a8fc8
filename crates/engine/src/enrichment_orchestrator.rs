// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Enrichment orchestrator (§4.8): for one indicator, dispatches a lookup
//! to every configured provider in parallel, bounded by a per-call
//! timeout. Never blocks finding persistence — the caller fires this and
//! moves on.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use tracing::warn;
use warden_adapters::EnrichmentProvider;
use warden_core::SessionId;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(15);

/// Narrow surface the orchestrator needs to publish progress, decoupling
/// it from the daemon's event bus.
#[async_trait::async_trait]
pub trait EnrichmentSink: Send + Sync {
    async fn emit_lookup_started(&self, session_id: Option<&SessionId>, provider: &str, indicator: &str);
    async fn emit_lookup_completed(&self, session_id: Option<&SessionId>, provider: &str, result_summary: &Value);
    async fn emit_lookup_failed(&self, session_id: Option<&SessionId>, provider: &str, error: &str);
    async fn emit_enrichment_applied(&self, session_id: Option<&SessionId>, enrichment_summary: &Value);
}

/// Looks up `indicator` (of the given type, one of `ip`/`domain`/`hash`)
/// against every provider concurrently, aggregates whatever succeeds, and
/// emits the `mcp.*` event sequence. Returns the aggregated summaries
/// keyed by provider name — providers that errored or timed out are
/// simply absent.
pub async fn enrich(
    providers: &[Arc<dyn EnrichmentProvider>],
    indicator_type: &'static str,
    indicator: String,
    session_id: Option<SessionId>,
    sink: Arc<dyn EnrichmentSink>,
) -> Value {
    let mut handles = Vec::with_capacity(providers.len());

    for provider in providers {
        let provider = Arc::clone(provider);
        let indicator = indicator.clone();
        let session_id = session_id.clone();
        let sink = Arc::clone(&sink);
        handles.push(tokio::spawn(async move {
            sink.emit_lookup_started(session_id.as_ref(), provider.name(), &indicator).await;
            let outcome = tokio::time::timeout(LOOKUP_TIMEOUT, provider.lookup(indicator_type, &indicator)).await;
            match outcome {
                Ok(Ok(result)) => {
                    sink.emit_lookup_completed(session_id.as_ref(), provider.name(), &result.summary).await;
                    Some((provider.name().to_string(), result.summary))
                }
                Ok(Err(e)) => {
                    warn!(provider = provider.name(), error = %e, "enrichment lookup failed");
                    sink.emit_lookup_failed(session_id.as_ref(), provider.name(), &e.to_string()).await;
                    None
                }
                Err(_) => {
                    warn!(provider = provider.name(), "enrichment lookup timed out");
                    sink.emit_lookup_failed(session_id.as_ref(), provider.name(), "lookup timed out").await;
                    None
                }
            }
        }));
    }

    let mut summaries = serde_json::Map::new();
    for handle in handles {
        if let Ok(Some((name, summary))) = handle.await {
            summaries.insert(name, summary);
        }
    }

    let enrichment_summary = json!({ "indicator": indicator, "providers": summaries });
    sink.emit_enrichment_applied(session_id.as_ref(), &enrichment_summary).await;
    enrichment_summary
}

#[cfg(test)]
#[path = "enrichment_orchestrator_tests.rs"]
mod tests;
