// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User repository.

use sqlx::{FromRow, PgPool};

use warden_core::{Role, User, UserId};

use crate::error::StorageError;

#[derive(Debug, FromRow)]
struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    role: String,
    active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::new(row.id),
            username: row.username,
            password_hash: row.password_hash,
            role: Role::parse_lossy(&row.role),
            active: row.active,
        }
    }
}

pub async fn insert(pool: &PgPool, user: &User) -> Result<(), StorageError> {
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, role, active) VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (id) DO UPDATE SET username = EXCLUDED.username, \
         password_hash = EXCLUDED.password_hash, role = EXCLUDED.role, active = EXCLUDED.active",
    )
    .bind(user.id.as_str())
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(user.active)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get(pool: &PgPool, id: &UserId) -> Result<User, StorageError> {
    let row: UserRow = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("user {id}")))?;
    Ok(row.into())
}

pub async fn get_by_username(pool: &PgPool, username: &str) -> Result<User, StorageError> {
    let row: UserRow = sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("user {username}")))?;
    Ok(row.into())
}

#[cfg(test)]
#[path = "user_tests.rs"]
mod tests;
