// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection health monitor: polls liveness every [`POLL_INTERVAL`] and, on
//! a dead connection, retries with exponential backoff before giving up.

use std::time::Duration;

use warden_core::{Event, SessionId};

use crate::engine::{ConnectConfig, ShellConnection, ShellError, SshCredentials};

pub const POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const MAX_RECONNECT_ATTEMPTS: u32 = 3;
pub const BACKOFF_BASE: Duration = Duration::from_secs(2);

/// Anything that can receive the events this monitor emits. Implemented by
/// the daemon crate's event bus; kept as a trait here so this crate doesn't
/// depend on the daemon crate.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

fn backoff_delay(attempt: u32) -> Duration {
    BACKOFF_BASE * 2u32.pow(attempt.saturating_sub(1))
}

/// Outcome of running the monitor loop to completion (it only completes on
/// shutdown or permanent connection loss).
pub enum MonitorOutcome {
    ShutdownRequested,
    ReconnectExhausted,
}

/// Runs until `shutdown` fires or reconnection attempts are exhausted.
/// Replaces `connection` in place with a freshly-reconnected handle whenever
/// a poll finds it dead.
pub async fn run(
    session_id: SessionId,
    config: ConnectConfig,
    creds: SshCredentials,
    connection: &mut ShellConnection,
    sink: &dyn EventSink,
    mut shutdown: tokio::sync::watch::Receiver<bool>,
) -> MonitorOutcome {
    loop {
        tokio::select! {
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
            _ = shutdown.changed() => {
                if *shutdown.borrow() {
                    return MonitorOutcome::ShutdownRequested;
                }
                continue;
            }
        }

        if connection.is_alive().await {
            continue;
        }

        sink.emit(Event::SshDisconnected {
            session_id: session_id.clone(),
        });

        match reconnect_with_backoff(&session_id, &config, &creds, sink).await {
            Some(new_connection) => *connection = new_connection,
            None => return MonitorOutcome::ReconnectExhausted,
        }
    }
}

async fn reconnect_with_backoff(
    session_id: &SessionId,
    config: &ConnectConfig,
    creds: &SshCredentials,
    sink: &dyn EventSink,
) -> Option<ShellConnection> {
    for attempt in 1..=MAX_RECONNECT_ATTEMPTS {
        tokio::time::sleep(backoff_delay(attempt)).await;
        match ShellConnection::connect(config.clone(), creds.clone()).await {
            Ok(conn) => {
                sink.emit(Event::SshConnected {
                    session_id: session_id.clone(),
                    fingerprint: conn.fingerprint.clone(),
                });
                return Some(conn);
            }
            Err(e) => {
                sink.emit(Event::SshError {
                    session_id: session_id.clone(),
                    code: "reconnect_failed".to_string(),
                    message: format_attempt_error(attempt, &e),
                });
            }
        }
    }
    None
}

fn format_attempt_error(attempt: u32, error: &ShellError) -> String {
    format!("reconnect attempt {attempt}/{MAX_RECONNECT_ATTEMPTS} failed: {error}")
}

#[cfg(test)]
#[path = "reconnect_tests.rs"]
mod tests;
