// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI configuration, loaded from the environment (§1a) the same way the
//! daemon's `Config::load()` reads its own process environment. The CLI
//! only needs the two variables its commands actually touch.

use std::env;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{0}`")]
    MissingVar(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub hunt_module_dir: String,
}

const DEFAULT_HUNT_MODULE_DIR: &str = "./hunt-modules";

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;
        let hunt_module_dir = env::var("HUNT_MODULE_DIR").unwrap_or_else(|_| DEFAULT_HUNT_MODULE_DIR.to_string());
        Ok(Self {
            database_url,
            hunt_module_dir,
        })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
