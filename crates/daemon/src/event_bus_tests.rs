// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use warden_core::SessionId;

fn session_id(s: &str) -> SessionId {
    SessionId::new(s)
}

fn user_id(s: &str) -> UserId {
    UserId::new(s)
}

#[tokio::test]
async fn owner_can_subscribe_and_receives_events() {
    let bus = EventBus::new(16);
    let sid = session_id("s1");
    let owner = user_id("analyst-1");
    bus.open_room(sid.clone(), owner.clone());

    let (_id, mut rx) = bus.subscribe(&sid, &owner, Role::Analyst).expect("subscribe");
    bus.publish(Event::SessionTerminated { session_id: sid.clone() })
        .await;

    let received = rx.recv().await.expect("event");
    assert_eq!(received.session_id(), Some(&sid));
}

#[tokio::test]
async fn non_owner_analyst_is_unauthorized() {
    let bus = EventBus::new(16);
    let sid = session_id("s1");
    bus.open_room(sid.clone(), user_id("owner"));

    let result = bus.subscribe(&sid, &user_id("someone-else"), Role::Analyst);
    assert!(matches!(result, Err(SubscribeError::Unauthorized { .. })));
}

#[tokio::test]
async fn admin_can_subscribe_to_any_room() {
    let bus = EventBus::new(16);
    let sid = session_id("s1");
    bus.open_room(sid.clone(), user_id("owner"));

    let result = bus.subscribe(&sid, &user_id("admin-1"), Role::Admin);
    assert!(result.is_ok());
}

#[tokio::test]
async fn unsubscribe_stops_further_delivery() {
    let bus = EventBus::new(16);
    let sid = session_id("s1");
    let owner = user_id("owner");
    bus.open_room(sid.clone(), owner.clone());

    let (id, mut rx) = bus.subscribe(&sid, &owner, Role::Analyst).expect("subscribe");
    bus.unsubscribe(&sid, id);
    bus.publish(Event::SessionTerminated { session_id: sid.clone() })
        .await;

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn close_room_drops_all_subscribers() {
    let bus = EventBus::new(16);
    let sid = session_id("s1");
    let owner = user_id("owner");
    bus.open_room(sid.clone(), owner.clone());
    let (_id, _rx) = bus.subscribe(&sid, &owner, Role::Analyst).expect("subscribe");

    bus.close_room(&sid);
    // Re-subscribing re-creates the room with whoever calls first as owner.
    let result = bus.subscribe(&sid, &user_id("someone-else"), Role::Analyst);
    assert!(result.is_ok());
}

#[tokio::test]
async fn session_less_event_reaches_only_admin_subscribers() {
    let bus = EventBus::new(16);
    let sid = session_id("s1");
    bus.open_room(sid.clone(), user_id("owner"));

    let (_id, mut admin_rx) = bus
        .subscribe(&sid, &user_id("admin-1"), Role::Admin)
        .expect("subscribe");
    let (_id2, mut analyst_rx) = bus
        .subscribe(&sid, &user_id("owner"), Role::Analyst)
        .expect("subscribe");

    bus.publish(Event::SystemBackpressure {
        component: "test".to_string(),
        queue_depth: 1,
        limit: 10,
    })
    .await;

    assert!(admin_rx.recv().await.is_some());
    assert!(analyst_rx.try_recv().is_err());
}
