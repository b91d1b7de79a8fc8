// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden hunt-module` - hunt-module registry inspection

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use warden_hunt::{parse_module, ModuleRegistry};

use crate::output::{print_json, OutputFormat};
use crate::table::{Column, Table};

#[derive(Args)]
pub struct HuntModuleArgs {
    #[command(subcommand)]
    pub command: HuntModuleCommand,
}

#[derive(Subcommand)]
pub enum HuntModuleCommand {
    /// List every module loaded from the hunt-module directory
    List,
    /// Parse a single hunt-module file and report any errors
    Validate {
        /// Path to the `.md` hunt-module file
        path: PathBuf,
    },
}

pub async fn handle(args: HuntModuleArgs, hunt_module_dir: &str, format: OutputFormat) -> Result<()> {
    match args.command {
        HuntModuleCommand::List => list(hunt_module_dir, format).await,
        HuntModuleCommand::Validate { path } => validate(&path, format),
    }
}

async fn list(hunt_module_dir: &str, format: OutputFormat) -> Result<()> {
    let registry = ModuleRegistry::load(hunt_module_dir).await?;
    let modules = registry.list().await;
    print_json(format, &modules)?;
    if matches!(format, OutputFormat::Text) {
        let mut table = Table::new(vec![
            Column::left("ID"),
            Column::left("NAME"),
            Column::status("SEVERITY HINT"),
            Column::right("STEPS"),
        ]);
        for module in &modules {
            table.row(vec![
                module.id.to_string(),
                module.name.clone(),
                module.severity_hint.as_str().to_string(),
                module.steps.len().to_string(),
            ]);
        }
        table.render(&mut std::io::stdout());
    }
    Ok(())
}

fn validate(path: &std::path::Path, format: OutputFormat) -> Result<()> {
    let source = std::fs::read_to_string(path)?;
    match parse_module(&source) {
        Ok(module) => {
            print_json(format, &module)?;
            if matches!(format, OutputFormat::Text) {
                println!("ok: {} ({} steps)", module.id, module.steps.len());
            }
            Ok(())
        }
        Err(e) => anyhow::bail!("{}: {e}", path.display()),
    }
}

#[cfg(test)]
#[path = "hunt_module_tests.rs"]
mod tests;
