// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden asset` - target asset management

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use sqlx::PgPool;

use warden_core::{Asset, AssetId, EncryptedCredentials, OsTag};
use warden_storage::asset as asset_store;

use crate::output::{print_json, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args)]
pub struct AssetArgs {
    #[command(subcommand)]
    pub command: AssetCommand,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OsArg {
    Linux,
    Windows,
    Macos,
}

impl From<OsArg> for OsTag {
    fn from(v: OsArg) -> Self {
        match v {
            OsArg::Linux => OsTag::Linux,
            OsArg::Windows => OsTag::Windows,
            OsArg::Macos => OsTag::Macos,
        }
    }
}

#[derive(Subcommand)]
pub enum AssetCommand {
    /// Register a target asset
    Add {
        /// Hostname
        hostname: String,
        /// IP address
        #[arg(long)]
        ip: String,
        /// Operating system family
        #[arg(long = "os", value_enum)]
        os: OsArg,
    },
    /// List registered assets
    List,
    /// Show a single asset
    Show {
        /// Asset id
        id: String,
    },
}

pub async fn handle(args: AssetArgs, pool: &PgPool, format: OutputFormat) -> Result<()> {
    match args.command {
        AssetCommand::Add { hostname, ip, os } => add(pool, hostname, ip, os.into(), format).await,
        AssetCommand::List => list(pool, format).await,
        AssetCommand::Show { id } => show(pool, &id, format).await,
    }
}

async fn add(pool: &PgPool, hostname: String, ip_address: String, os_tag: OsTag, format: OutputFormat) -> Result<()> {
    let asset = Asset {
        id: AssetId::new(uuid::Uuid::new_v4().to_string()),
        hostname,
        ip_address,
        os_tag,
        tags: Default::default(),
        credentials: EncryptedCredentials::default(),
    };
    asset_store::insert(pool, &asset).await?;
    print_json(format, &asset)?;
    if matches!(format, OutputFormat::Text) {
        println!("added asset {} ({})", asset.id, asset.hostname);
    }
    Ok(())
}

async fn list(pool: &PgPool, format: OutputFormat) -> Result<()> {
    let assets = asset_store::list(pool).await?;
    print_json(format, &assets)?;
    if matches!(format, OutputFormat::Text) {
        let mut table = Table::new(vec![
            Column::left("ID"),
            Column::left("HOSTNAME"),
            Column::left("IP"),
            Column::left("OS"),
        ]);
        for asset in &assets {
            table.row(vec![
                asset.id.to_string(),
                asset.hostname.clone(),
                asset.ip_address.clone(),
                asset.os_tag.as_str().to_string(),
            ]);
        }
        table.render(&mut std::io::stdout());
    }
    Ok(())
}

async fn show(pool: &PgPool, id: &str, format: OutputFormat) -> Result<()> {
    let asset = asset_store::get(pool, &AssetId::new(id.to_string())).await?;
    print_json(format, &asset)?;
    if matches!(format, OutputFormat::Text) {
        println!("id:       {}", asset.id);
        println!("hostname: {}", asset.hostname);
        println!("ip:       {}", asset.ip_address);
        println!("os:       {}", asset.os_tag.as_str());
        for (k, v) in &asset.tags {
            println!("tag:      {k}={v}");
        }
    }
    Ok(())
}
