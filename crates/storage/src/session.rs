// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session repository. Only the persisted shape is handled here — the
//! runtime handles (locks, remote-shell connection) live in the daemon's
//! in-memory session manager and are never written through.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use warden_core::{AssetId, Session, SessionId, SessionMode, SessionState, UserId};

use crate::error::StorageError;

#[derive(Debug, FromRow)]
struct SessionRow {
    id: String,
    asset_id: String,
    analyst_id: String,
    state: String,
    mode: String,
    locked_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: SessionId::new(row.id),
            asset_id: AssetId::new(row.asset_id),
            analyst_id: UserId::new(row.analyst_id),
            state: SessionState::parse_lossy(&row.state),
            mode: SessionMode::parse_lossy(&row.mode),
            locked_by: row.locked_by.map(UserId::new),
            created_at: row.created_at,
        }
    }
}

pub async fn insert(pool: &PgPool, session: &Session) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO sessions (id, asset_id, analyst_id, state, mode, locked_by, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         ON CONFLICT (id) DO UPDATE SET state = EXCLUDED.state, mode = EXCLUDED.mode, \
         locked_by = EXCLUDED.locked_by",
    )
    .bind(session.id.as_str())
    .bind(session.asset_id.as_str())
    .bind(session.analyst_id.as_str())
    .bind(session.state.as_str())
    .bind(session.mode.as_str())
    .bind(session.locked_by.as_ref().map(UserId::as_str))
    .bind(session.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Writes through just the FSM state, per §4.1's "updates the in-memory
/// state; writes through to the persistent row when a DB handle is
/// provided" — the common case on every transition, not a full upsert.
pub async fn update_state(pool: &PgPool, id: &SessionId, state: SessionState) -> Result<(), StorageError> {
    sqlx::query("UPDATE sessions SET state = $1 WHERE id = $2")
        .bind(state.as_str())
        .bind(id.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn get(pool: &PgPool, id: &SessionId) -> Result<Session, StorageError> {
    let row: SessionRow = sqlx::query_as("SELECT * FROM sessions WHERE id = $1")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("session {id}")))?;
    Ok(row.into())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
