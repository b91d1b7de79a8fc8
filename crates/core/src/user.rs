// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Analyst/admin user accounts. Token issuance lives outside this crate
//! (§1 of the design doc treats it as an external collaborator); this type
//! only carries what the core needs to authorise room joins and attribute
//! timeline events.

use serde::{Deserialize, Serialize};

crate::define_id! {
    pub struct UserId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Analyst,
    Admin,
}

impl Role {
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::Analyst,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analyst => "analyst",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Salted one-way hash; never the plaintext password.
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
}
