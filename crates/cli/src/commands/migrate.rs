// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden migrate` - applies the storage crate's embedded migrations

use anyhow::Result;
use sqlx::PgPool;

pub async fn run(pool: &PgPool) -> Result<()> {
    warden_storage::migrate(pool).await?;
    println!("migrations applied");
    Ok(())
}
