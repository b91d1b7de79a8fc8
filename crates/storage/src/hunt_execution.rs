// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! HuntExecution repository. `ai_report_text` is written through an
//! independent transaction from `observations` per §9 — the orchestrator
//! appends observations as steps complete, while the AI pipeline writes
//! the report only once streaming finishes, and a slow report must not
//! block the hunt's own observation writes.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use warden_core::{HuntExecution, HuntExecutionId, HuntModuleId, HuntState, Observation, SessionId};

use crate::error::StorageError;

#[derive(Debug, FromRow)]
struct HuntExecutionRow {
    id: String,
    session_id: String,
    module_id: String,
    state: String,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    observations: serde_json::Value,
    ai_report_text: Option<String>,
}

impl TryFrom<HuntExecutionRow> for HuntExecution {
    type Error = serde_json::Error;

    fn try_from(row: HuntExecutionRow) -> Result<Self, Self::Error> {
        let observations: Vec<Observation> = serde_json::from_value(row.observations)?;
        Ok(HuntExecution {
            id: HuntExecutionId::new(row.id),
            session_id: SessionId::new(row.session_id),
            module_id: HuntModuleId::new(row.module_id),
            state: parse_hunt_state_lossy(&row.state),
            started_at: row.started_at,
            finished_at: row.finished_at,
            observations,
            ai_report_text: row.ai_report_text,
        })
    }
}

fn parse_hunt_state_lossy(s: &str) -> HuntState {
    match s {
        "running" => HuntState::Running,
        "completed" => HuntState::Completed,
        "failed" => HuntState::Failed,
        "cancelled" => HuntState::Cancelled,
        _ => HuntState::Pending,
    }
}

pub async fn insert(pool: &PgPool, execution: &HuntExecution) -> Result<(), StorageError> {
    let observations = serde_json::to_value(&execution.observations).unwrap_or_default();
    sqlx::query(
        "INSERT INTO hunt_executions (id, session_id, module_id, state, started_at, finished_at, \
         observations, ai_report_text) VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (id) DO UPDATE SET state = EXCLUDED.state, finished_at = EXCLUDED.finished_at, \
         observations = EXCLUDED.observations",
    )
    .bind(execution.id.as_str())
    .bind(execution.session_id.as_str())
    .bind(execution.module_id.as_str())
    .bind(execution.state.as_str())
    .bind(execution.started_at)
    .bind(execution.finished_at)
    .bind(observations)
    .bind(&execution.ai_report_text)
    .execute(pool)
    .await?;
    Ok(())
}

/// Appends one observation and updates state, independent of any
/// in-flight AI report write (§9).
pub async fn append_observation(
    pool: &PgPool,
    id: &HuntExecutionId,
    observation: &Observation,
) -> Result<(), StorageError> {
    let observation = serde_json::to_value(observation).unwrap_or_default();
    sqlx::query("UPDATE hunt_executions SET observations = observations || $1::jsonb WHERE id = $2")
        .bind(serde_json::Value::Array(vec![observation]))
        .bind(id.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

/// Writes the assembled AI report text in its own transaction, independent
/// of observation appends (§9).
pub async fn write_ai_report(pool: &PgPool, id: &HuntExecutionId, report_text: &str) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE hunt_executions SET ai_report_text = $1 WHERE id = $2")
        .bind(report_text)
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}

pub async fn get(pool: &PgPool, id: &HuntExecutionId) -> Result<HuntExecution, StorageError> {
    let row: HuntExecutionRow = sqlx::query_as("SELECT * FROM hunt_executions WHERE id = $1")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("hunt execution {id}")))?;
    row.try_into()
        .map_err(|e: serde_json::Error| StorageError::Db(sqlx::Error::Decode(Box::new(e))))
}

#[cfg(test)]
#[path = "hunt_execution_tests.rs"]
mod tests;
