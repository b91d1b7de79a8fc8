// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TimelineEvent: immutable audit log entry for an asset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::asset::AssetId;
use crate::session::SessionId;
use crate::user::UserId;

crate::define_id! {
    pub struct TimelineEventId;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: TimelineEventId,
    pub asset_id: AssetId,
    pub session_id: Option<SessionId>,
    pub event_type: String,
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
    pub analyst_id: UserId,
}
