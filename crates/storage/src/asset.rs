// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Asset repository. `EncryptedCredentials` fields flatten onto the
//! `assets` row rather than a joined table — one asset has exactly one
//! credential bundle, and the storage crate never decrypts it.

use sqlx::{FromRow, PgPool};

use warden_core::{Asset, AssetId, EncryptedCredentials, OsTag, SudoMethod};

use crate::error::StorageError;

#[derive(Debug, FromRow)]
struct AssetRow {
    id: String,
    hostname: String,
    ip_address: String,
    os_tag: String,
    tags: serde_json::Value,
    username: Option<String>,
    ssh_key_ciphertext: Option<Vec<u8>>,
    ssh_password_ciphertext: Option<Vec<u8>>,
    sudo_method: Option<String>,
    sudo_password_ciphertext: Option<Vec<u8>>,
}

impl From<AssetRow> for Asset {
    fn from(row: AssetRow) -> Self {
        Asset {
            id: AssetId::new(row.id),
            hostname: row.hostname,
            ip_address: row.ip_address,
            os_tag: OsTag::parse_lossy(&row.os_tag),
            tags: serde_json::from_value(row.tags).unwrap_or_default(),
            credentials: EncryptedCredentials {
                username: row.username,
                ssh_key_ciphertext: row.ssh_key_ciphertext,
                ssh_password_ciphertext: row.ssh_password_ciphertext,
                sudo_method: row.sudo_method.as_deref().map(SudoMethod::parse_lossy),
                sudo_password_ciphertext: row.sudo_password_ciphertext,
            },
        }
    }
}

pub async fn insert(pool: &PgPool, asset: &Asset) -> Result<(), StorageError> {
    let tags = serde_json::to_value(&asset.tags).unwrap_or_default();
    sqlx::query(
        "INSERT INTO assets (id, hostname, ip_address, os_tag, tags, username, \
         ssh_key_ciphertext, ssh_password_ciphertext, sudo_method, sudo_password_ciphertext) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (id) DO UPDATE SET hostname = EXCLUDED.hostname, ip_address = EXCLUDED.ip_address, \
         os_tag = EXCLUDED.os_tag, tags = EXCLUDED.tags, username = EXCLUDED.username, \
         ssh_key_ciphertext = EXCLUDED.ssh_key_ciphertext, \
         ssh_password_ciphertext = EXCLUDED.ssh_password_ciphertext, \
         sudo_method = EXCLUDED.sudo_method, \
         sudo_password_ciphertext = EXCLUDED.sudo_password_ciphertext",
    )
    .bind(asset.id.as_str())
    .bind(&asset.hostname)
    .bind(&asset.ip_address)
    .bind(asset.os_tag.as_str())
    .bind(tags)
    .bind(&asset.credentials.username)
    .bind(&asset.credentials.ssh_key_ciphertext)
    .bind(&asset.credentials.ssh_password_ciphertext)
    .bind(asset.credentials.sudo_method.map(|m| m.as_str()))
    .bind(&asset.credentials.sudo_password_ciphertext)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn get(pool: &PgPool, id: &AssetId) -> Result<Asset, StorageError> {
    let row: AssetRow = sqlx::query_as("SELECT * FROM assets WHERE id = $1")
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::NotFound(format!("asset {id}")))?;
    Ok(row.into())
}

pub async fn list(pool: &PgPool) -> Result<Vec<Asset>, StorageError> {
    let rows: Vec<AssetRow> = sqlx::query_as("SELECT * FROM assets ORDER BY hostname")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(Asset::from).collect())
}

#[cfg(test)]
#[path = "asset_tests.rs"]
mod tests;
