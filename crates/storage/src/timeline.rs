// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TimelineEvent repository. Immutable audit rows — there is no update
//! path, only insert and read-back.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use warden_core::{AssetId, SessionId, TimelineEvent, TimelineEventId, UserId};

use crate::error::StorageError;

#[derive(Debug, FromRow)]
struct TimelineEventRow {
    id: String,
    asset_id: String,
    session_id: Option<String>,
    event_type: String,
    payload: serde_json::Value,
    timestamp: DateTime<Utc>,
    analyst_id: String,
}

impl From<TimelineEventRow> for TimelineEvent {
    fn from(row: TimelineEventRow) -> Self {
        TimelineEvent {
            id: TimelineEventId::new(row.id),
            asset_id: AssetId::new(row.asset_id),
            session_id: row.session_id.map(SessionId::new),
            event_type: row.event_type,
            payload: row.payload,
            timestamp: row.timestamp,
            analyst_id: UserId::new(row.analyst_id),
        }
    }
}

pub async fn insert(pool: &PgPool, event: &TimelineEvent) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO timeline_events (id, asset_id, session_id, event_type, payload, timestamp, analyst_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(event.id.as_str())
    .bind(event.asset_id.as_str())
    .bind(event.session_id.as_ref().map(SessionId::as_str))
    .bind(&event.event_type)
    .bind(&event.payload)
    .bind(event.timestamp)
    .bind(event.analyst_id.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_for_asset(pool: &PgPool, asset_id: &AssetId) -> Result<Vec<TimelineEvent>, StorageError> {
    let rows: Vec<TimelineEventRow> =
        sqlx::query_as("SELECT * FROM timeline_events WHERE asset_id = $1 ORDER BY timestamp DESC")
            .bind(asset_id.as_str())
            .fetch_all(pool)
            .await?;
    Ok(rows.into_iter().map(TimelineEvent::from).collect())
}

#[cfg(test)]
#[path = "timeline_tests.rs"]
mod tests;
