// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden finding` - deduplicated finding inspection

use anyhow::Result;
use clap::{Args, Subcommand};
use sqlx::PgPool;

use warden_core::AssetId;
use warden_storage::finding as finding_store;

use crate::output::{print_json, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args)]
pub struct FindingArgs {
    #[command(subcommand)]
    pub command: FindingCommand,
}

#[derive(Subcommand)]
pub enum FindingCommand {
    /// List findings for an asset, most recently seen first
    List {
        /// Asset id
        #[arg(long = "asset")]
        asset_id: String,
    },
}

pub async fn handle(args: FindingArgs, pool: &PgPool, format: OutputFormat) -> Result<()> {
    match args.command {
        FindingCommand::List { asset_id } => list(pool, &asset_id, format).await,
    }
}

async fn list(pool: &PgPool, asset_id: &str, format: OutputFormat) -> Result<()> {
    let findings = finding_store::list_for_asset(pool, &AssetId::new(asset_id.to_string())).await?;
    print_json(format, &findings)?;
    if matches!(format, OutputFormat::Text) {
        let mut table = Table::new(vec![
            Column::left("ID"),
            Column::status("SEVERITY"),
            Column::right("CONFIDENCE"),
            Column::left("TITLE").with_max(60),
            Column::right("SIGHTINGS"),
            Column::left("STATUS"),
        ]);
        for finding in &findings {
            table.row(vec![
                finding.id.to_string(),
                finding.severity.as_str().to_string(),
                format!("{:.2}", finding.confidence),
                finding.title.clone(),
                finding.sighting_count.to_string(),
                finding.status.as_str().to_string(),
            ]);
        }
        table.render(&mut std::io::stdout());
    }
    Ok(())
}
