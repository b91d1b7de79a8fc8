// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for daemon communication.
//!
//! Unlike the job-queue engine's WAL-backed bus, this is a genuine
//! in-memory bounded channel per subscriber: there is no durable replay
//! requirement here, every event is re-derivable from the session/hunt
//! state it describes, and a dropped real-time event simply means a client
//! reconnects and re-syncs from the REST surface.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;
use warden_core::{Event, Role, SessionId, UserId};

const PUBLISH_TIMEOUT: Duration = Duration::from_millis(100);
const BACKPRESSURE_RATIO: f64 = 0.9;

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("analyst {analyst_id} is not authorized to join session {session_id}")]
    Unauthorized {
        analyst_id: UserId,
        session_id: SessionId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    tx: mpsc::Sender<Event>,
    role: Role,
}

struct Room {
    owner: UserId,
    subscribers: Vec<Subscriber>,
}

pub struct EventBus {
    capacity: usize,
    next_id: AtomicU64,
    rooms: Mutex<HashMap<SessionId, Room>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            next_id: AtomicU64::new(1),
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a room for a freshly-created session, owned by `analyst_id`.
    pub fn open_room(&self, session_id: SessionId, analyst_id: UserId) {
        self.rooms.lock().entry(session_id).or_insert_with(|| Room {
            owner: analyst_id,
            subscribers: Vec::new(),
        });
    }

    pub fn close_room(&self, session_id: &SessionId) {
        self.rooms.lock().remove(session_id);
    }

    /// Joins a session's room. Authorized only for the session's owning
    /// analyst or a user with the `admin` role.
    pub fn subscribe(
        &self,
        session_id: &SessionId,
        analyst_id: &UserId,
        role: Role,
    ) -> Result<(SubscriberId, mpsc::Receiver<Event>), SubscribeError> {
        let mut rooms = self.rooms.lock();
        let room = rooms.entry(session_id.clone()).or_insert_with(|| Room {
            owner: analyst_id.clone(),
            subscribers: Vec::new(),
        });
        if role != Role::Admin && &room.owner != analyst_id {
            return Err(SubscribeError::Unauthorized {
                analyst_id: analyst_id.clone(),
                session_id: session_id.clone(),
            });
        }
        let (tx, rx) = mpsc::channel(self.capacity);
        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        room.subscribers.push(Subscriber { id, tx, role });
        Ok((id, rx))
    }

    pub fn unsubscribe(&self, session_id: &SessionId, subscriber_id: SubscriberId) {
        if let Some(room) = self.rooms.lock().get_mut(session_id) {
            room.subscribers.retain(|s| s.id != subscriber_id);
        }
    }

    /// Publishes `event` to the room matching its `session_id`, or to every
    /// admin subscriber across all rooms for session-less system events.
    /// Each send has a 100 ms timeout; a subscriber whose queue is already
    /// at ≥90% depth triggers a `system.backpressure` signal before the
    /// send is attempted.
    pub async fn publish(&self, event: Event) {
        let targets: Vec<mpsc::Sender<Event>> = {
            let rooms = self.rooms.lock();
            match event.session_id() {
                Some(session_id) => rooms
                    .get(session_id)
                    .map(|room| room.subscribers.iter().map(|s| s.tx.clone()).collect())
                    .unwrap_or_default(),
                None => rooms
                    .values()
                    .flat_map(|room| &room.subscribers)
                    .filter(|s| s.role == Role::Admin)
                    .map(|s| s.tx.clone())
                    .collect(),
            }
        };

        for tx in targets {
            self.signal_backpressure_if_needed(&tx);
            let _ = tx.send_timeout(event.clone(), PUBLISH_TIMEOUT).await;
        }
    }

    fn signal_backpressure_if_needed(&self, tx: &mpsc::Sender<Event>) {
        let limit = tx.max_capacity();
        if limit == 0 {
            return;
        }
        let used = limit - tx.capacity();
        if used as f64 / limit as f64 >= BACKPRESSURE_RATIO {
            let signal = Event::SystemBackpressure {
                component: "event_bus".to_string(),
                queue_depth: used,
                limit,
            };
            let _ = tx.try_send(signal);
        }
    }
}

#[cfg(test)]
#[path = "event_bus_tests.rs"]
mod tests;
