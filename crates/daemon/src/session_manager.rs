// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session manager: the registry of live sessions, their FSM state, and the
//! three per-session locks (command, AI, mode) that serialise access to a
//! session's remote-shell connection. Capacity is enforced by a counting
//! semaphore sized by `max_sessions` (§5); a background reaper removes
//! DISCONNECTED/FAILED sessions older than an hour.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex as SyncMutex;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use warden_core::{Clock, Session, SessionError, SessionId, SessionState};

pub const REAP_INTERVAL: Duration = Duration::from_secs(5 * 60);
pub const REAP_AGE: chrono::Duration = chrono::Duration::hours(1);

#[derive(Debug, Error)]
pub enum SessionManagerError {
    #[error("session capacity exhausted")]
    CapacityExhausted,
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error(transparent)]
    Transition(#[from] SessionError),
}

/// Per-session runtime locks, kept out of `warden_core::Session` since that
/// type is the synchronous persisted shape and has no opinion on the async
/// runtime.
pub struct SessionLocks {
    pub command: Mutex<()>,
    pub ai: Mutex<()>,
    pub mode: Mutex<()>,
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self {
            command: Mutex::new(()),
            ai: Mutex::new(()),
            mode: Mutex::new(()),
        }
    }
}

struct Entry {
    session: Session,
    locks: Arc<SessionLocks>,
    _permit: OwnedSemaphorePermit,
}

pub struct SessionManager<C: Clock> {
    clock: C,
    semaphore: Arc<Semaphore>,
    sessions: SyncMutex<HashMap<SessionId, Entry>>,
}

impl<C: Clock> SessionManager<C> {
    pub fn new(clock: C, max_sessions: usize) -> Self {
        Self {
            clock,
            semaphore: Arc::new(Semaphore::new(max_sessions)),
            sessions: SyncMutex::new(HashMap::new()),
        }
    }

    /// Registers a newly created session, consuming one capacity permit.
    /// Returns `CapacityExhausted` immediately rather than waiting, per §5
    /// and the 503 behaviour in §6.
    pub fn register(&self, session: Session) -> Result<Arc<SessionLocks>, SessionManagerError> {
        let permit = Arc::clone(&self.semaphore)
            .try_acquire_owned()
            .map_err(|_| SessionManagerError::CapacityExhausted)?;
        let locks = Arc::new(SessionLocks::default());
        let id = session.id.clone();
        self.sessions.lock().insert(
            id,
            Entry {
                session,
                locks: Arc::clone(&locks),
                _permit: permit,
            },
        );
        Ok(locks)
    }

    pub fn get(&self, id: &SessionId) -> Option<Session> {
        self.sessions.lock().get(id).map(|e| e.session.clone())
    }

    pub fn locks(&self, id: &SessionId) -> Option<Arc<SessionLocks>> {
        self.sessions.lock().get(id).map(|e| Arc::clone(&e.locks))
    }

    pub fn transition(
        &self,
        id: &SessionId,
        to: SessionState,
    ) -> Result<SessionState, SessionManagerError> {
        let mut sessions = self.sessions.lock();
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| SessionManagerError::NotFound(id.clone()))?;
        Ok(entry.session.transition(to)?)
    }

    /// Drops any session in DISCONNECTED or FAILED whose `created_at` is
    /// older than [`REAP_AGE`]. Releases that session's capacity permit.
    /// Returns the reaped session ids.
    pub fn reap(&self) -> Vec<SessionId> {
        let now = self.clock.now();
        let mut sessions = self.sessions.lock();
        let stale: Vec<SessionId> = sessions
            .iter()
            .filter(|(_, entry)| {
                matches!(
                    entry.session.state,
                    SessionState::Disconnected | SessionState::Failed
                ) && now - entry.session.created_at > REAP_AGE
            })
            .map(|(id, _)| id.clone())
            .collect();
        for id in &stale {
            sessions.remove(id);
        }
        stale
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs `reap` on a loop at [`REAP_INTERVAL`] until `shutdown` fires.
    pub async fn run_reap_loop(&self, mut shutdown: tokio::sync::watch::Receiver<bool>) {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(REAP_INTERVAL) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                    continue;
                }
            }
            let reaped = self.reap();
            if !reaped.is_empty() {
                tracing::info!(count = reaped.len(), "reaped stale sessions");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_manager_tests.rs"]
mod tests;
