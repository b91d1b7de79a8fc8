// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration, loaded entirely from the environment (§1a). This
//! is a server-style config surface, not a user-level CLI daemon, so unlike
//! the lifecycle config this crate's ancestor loaded from a fixed XDG path,
//! `Config::load()` here reads environment variables.

use std::env;

use thiserror::Error;

const MIN_SECRET_LEN: usize = 32;
const DEFAULT_MAX_SESSIONS: usize = 50;
const DEFAULT_EVENT_QUEUE_DEPTH: usize = 1000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable `{0}`")]
    MissingVar(&'static str),
    #[error("`PROCESS_SECRET` must be at least {MIN_SECRET_LEN} characters")]
    WeakSecret,
    #[error("`{name}` is not a valid value: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct VaultConfig {
    pub addr: String,
    pub role_id: String,
    pub secret_id: String,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub ollama_base_url: Option<String>,
    pub virustotal_api_key: Option<String>,
    pub shodan_api_key: Option<String>,
    pub abuseipdb_api_key: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub process_secret: String,
    pub vault: Option<VaultConfig>,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub cors_origins: Vec<String>,
    pub max_sessions: usize,
    pub event_queue_depth: usize,
    pub hunt_module_dir: String,
    pub providers: ProviderConfig,
}

impl Config {
    /// Loads configuration from environment variables. Unset required
    /// variables are startup-fatal, reported before any other subsystem
    /// initializes.
    pub fn load() -> Result<Self, ConfigError> {
        let database_url = required_var("DATABASE_URL")?;
        let process_secret = required_var("PROCESS_SECRET")?;
        if process_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::WeakSecret);
        }

        let vault = load_vault_config()?;

        let access_token_ttl_secs = parse_var_or("ACCESS_TOKEN_TTL_SECS", 900)?;
        let refresh_token_ttl_secs = parse_var_or("REFRESH_TOKEN_TTL_SECS", 604_800)?;
        let cors_origins = env::var("CORS_ORIGINS")
            .ok()
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default();
        let max_sessions = parse_var_or("MAX_SESSIONS", DEFAULT_MAX_SESSIONS)?;
        let event_queue_depth = parse_var_or("EVENT_QUEUE_DEPTH", DEFAULT_EVENT_QUEUE_DEPTH)?;
        let hunt_module_dir = required_var("HUNT_MODULE_DIR")?;

        Ok(Self {
            database_url,
            process_secret,
            vault,
            access_token_ttl_secs,
            refresh_token_ttl_secs,
            cors_origins,
            max_sessions,
            event_queue_depth,
            hunt_module_dir,
            providers: ProviderConfig {
                anthropic_api_key: env::var("ANTHROPIC_API_KEY").ok(),
                openai_api_key: env::var("OPENAI_API_KEY").ok(),
                ollama_base_url: env::var("OLLAMA_BASE_URL").ok(),
                virustotal_api_key: env::var("VIRUSTOTAL_API_KEY").ok(),
                shodan_api_key: env::var("SHODAN_API_KEY").ok(),
                abuseipdb_api_key: env::var("ABUSEIPDB_API_KEY").ok(),
            },
        })
    }
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

fn parse_var_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
        Err(_) => Ok(default),
    }
}

fn load_vault_config() -> Result<Option<VaultConfig>, ConfigError> {
    let addr = env::var("VAULT_ADDR").ok();
    let role_id = env::var("VAULT_ROLE_ID").ok();
    let secret_id = env::var("VAULT_SECRET_ID").ok();
    match (addr, role_id, secret_id) {
        (Some(addr), Some(role_id), Some(secret_id)) => Ok(Some(VaultConfig {
            addr,
            role_id,
            secret_id,
        })),
        (None, None, None) => Ok(None),
        _ => Ok(None),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
