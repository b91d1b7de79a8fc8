// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! warden - operator CLI over the storage and hunt-module crates. Talks
//! directly to Postgres; it does not go through the daemon's session
//! protocol, which is analyst-facing WebSocket traffic out of this
//! surface's scope (§6).

mod color;
mod commands;
mod config;
mod output;
mod table;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{asset, finding, hunt_module, migrate};
use config::Config;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "warden", version, about = "Threat-hunting platform operator CLI")]
struct Cli {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the storage crate's embedded migrations
    Migrate,
    /// Target asset management
    Asset(asset::AssetArgs),
    /// Hunt-module registry inspection
    HuntModule(hunt_module::HuntModuleArgs),
    /// Deduplicated finding inspection
    Finding(finding::FindingArgs),
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Migrate => {
            let pool = warden_storage::connect(&config.database_url).await?;
            migrate::run(&pool).await
        }
        Commands::Asset(args) => {
            let pool = warden_storage::connect(&config.database_url).await?;
            asset::handle(args, &pool, cli.output).await
        }
        Commands::HuntModule(args) => hunt_module::handle(args, &config.hunt_module_dir, cli.output).await,
        Commands::Finding(args) => {
            let pool = warden_storage::connect(&config.database_url).await?;
            finding::handle(args, &pool, cli.output).await
        }
    }
}
