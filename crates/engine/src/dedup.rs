// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Finding deduplicator (§4.7): hashes an AI finding to its dedup key and
//! upserts it in its own transaction, independent of the hunt orchestrator's
//! step loop — findings must survive rollback or disconnect of the session
//! that produced them.

use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;
use warden_core::{AssetId, Clock, Finding, FindingId, FindingStatus, HuntExecutionId, SessionId, Severity};
use warden_storage::StorageError;

use crate::ai::RawFinding;

/// Computes the dedup key: `SHA-256(asset_id|title|primary_technique_id)`,
/// where `primary_technique_id` is the first technique id or empty.
pub fn content_hash(asset_id: &AssetId, title: &str, technique_ids: &[String]) -> String {
    let primary = technique_ids.first().map(String::as_str).unwrap_or("");
    let mut hasher = Sha256::new();
    hasher.update(asset_id.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(primary.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Builds a fresh, not-yet-persisted `Finding` from a pipeline extraction
/// result. Callers attach the STIX bundle and remediation object before
/// calling `upsert`.
pub fn new_finding<C: Clock>(
    clock: &C,
    session_id: SessionId,
    asset_id: AssetId,
    hunt_execution_id: HuntExecutionId,
    raw: &RawFinding,
    stix_bundle: serde_json::Value,
    remediation: serde_json::Value,
) -> Finding {
    let now = clock.now();
    let hash = content_hash(&asset_id, &raw.title, &raw.technique_ids);
    Finding {
        id: FindingId::new(Uuid::new_v4().to_string()),
        session_id,
        asset_id,
        hunt_execution_id,
        title: raw.title.clone(),
        severity: Severity::parse_lossy(&raw.severity),
        confidence: raw.confidence,
        content_hash: hash,
        first_seen: now,
        last_seen: now,
        sighting_count: 1,
        stix_bundle,
        remediation,
        status: FindingStatus::Open,
    }
}

/// Upserts the finding in its own unit of work (§4.7: "findings are written
/// out-of-band" — never shares a transaction with the orchestrator).
pub async fn upsert(pool: &PgPool, finding: &Finding) -> Result<(), StorageError> {
    warden_storage::finding::upsert(pool, finding).await
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
