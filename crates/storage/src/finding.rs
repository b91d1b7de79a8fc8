// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Finding repository. The upsert-by-content-hash semantics (sighting
//! increment, monotonic confidence max-merge) live in the engine crate's
//! deduplicator; this module only persists whatever record it is handed.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use warden_core::{AssetId, Finding, FindingId, FindingStatus, HuntExecutionId, SessionId, Severity};

use crate::error::StorageError;

#[derive(Debug, FromRow)]
struct FindingRow {
    id: String,
    session_id: String,
    asset_id: String,
    hunt_execution_id: String,
    title: String,
    severity: String,
    confidence: f64,
    content_hash: String,
    first_seen: DateTime<Utc>,
    last_seen: DateTime<Utc>,
    sighting_count: i32,
    stix_bundle: serde_json::Value,
    remediation: serde_json::Value,
    status: String,
}

fn parse_finding_status_lossy(s: &str) -> FindingStatus {
    match s {
        "acknowledged" => FindingStatus::Acknowledged,
        "resolved" => FindingStatus::Resolved,
        _ => FindingStatus::Open,
    }
}

impl From<FindingRow> for Finding {
    fn from(row: FindingRow) -> Self {
        Finding {
            id: FindingId::new(row.id),
            session_id: SessionId::new(row.session_id),
            asset_id: AssetId::new(row.asset_id),
            hunt_execution_id: HuntExecutionId::new(row.hunt_execution_id),
            title: row.title,
            severity: Severity::parse_lossy(&row.severity),
            confidence: row.confidence,
            content_hash: row.content_hash,
            first_seen: row.first_seen,
            last_seen: row.last_seen,
            sighting_count: row.sighting_count.max(0) as u32,
            stix_bundle: row.stix_bundle,
            remediation: row.remediation,
            status: parse_finding_status_lossy(&row.status),
        }
    }
}

/// Upserts by `content_hash` per the invariant in §3: a re-insert is a
/// sighting increment and a monotonic max-merge of confidence, never a
/// blind overwrite.
pub async fn upsert(pool: &PgPool, finding: &Finding) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO findings (id, session_id, asset_id, hunt_execution_id, title, severity, \
         confidence, content_hash, first_seen, last_seen, sighting_count, stix_bundle, remediation, status) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         ON CONFLICT (content_hash) DO UPDATE SET \
         confidence = GREATEST(findings.confidence, EXCLUDED.confidence), \
         last_seen = EXCLUDED.last_seen, \
         sighting_count = findings.sighting_count + 1, \
         stix_bundle = EXCLUDED.stix_bundle, \
         remediation = EXCLUDED.remediation",
    )
    .bind(finding.id.as_str())
    .bind(finding.session_id.as_str())
    .bind(finding.asset_id.as_str())
    .bind(finding.hunt_execution_id.as_str())
    .bind(&finding.title)
    .bind(finding.severity.as_str())
    .bind(finding.confidence)
    .bind(&finding.content_hash)
    .bind(finding.first_seen)
    .bind(finding.last_seen)
    .bind(finding.sighting_count as i32)
    .bind(&finding.stix_bundle)
    .bind(&finding.remediation)
    .bind(finding.status.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get_by_content_hash(pool: &PgPool, content_hash: &str) -> Result<Option<Finding>, StorageError> {
    let row: Option<FindingRow> = sqlx::query_as("SELECT * FROM findings WHERE content_hash = $1")
        .bind(content_hash)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Finding::from))
}

pub async fn list_for_asset(pool: &PgPool, asset_id: &AssetId) -> Result<Vec<Finding>, StorageError> {
    let rows: Vec<FindingRow> =
        sqlx::query_as("SELECT * FROM findings WHERE asset_id = $1 ORDER BY last_seen DESC")
            .bind(asset_id.as_str())
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(Finding::from).collect())
}

#[cfg(test)]
#[path = "finding_tests.rs"]
mod tests;
