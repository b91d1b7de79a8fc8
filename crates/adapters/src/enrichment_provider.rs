// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `EnrichmentProvider`: abstracted as `(type, value) -> EnrichmentResult`
//! per §1. Three concrete IOC lookup backends (§4.8).

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("enrichment request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("provider returned a non-success status: {0}")]
    Status(u16),
}

#[derive(Debug, Clone)]
pub struct EnrichmentResult {
    pub provider: &'static str,
    pub summary: Value,
}

#[async_trait]
pub trait EnrichmentProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn lookup(&self, indicator_type: &str, value: &str) -> Result<EnrichmentResult, EnrichmentError>;
}

pub struct VirusTotalProvider {
    api_key: String,
    client: reqwest::Client,
}

impl VirusTotalProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EnrichmentProvider for VirusTotalProvider {
    fn name(&self) -> &'static str {
        "virustotal"
    }

    async fn lookup(&self, indicator_type: &str, value: &str) -> Result<EnrichmentResult, EnrichmentError> {
        let collection = match indicator_type {
            "ip" => "ip_addresses",
            "domain" => "domains",
            _ => "files",
        };
        let url = format!("https://www.virustotal.com/api/v3/{collection}/{value}");
        let response = self
            .client
            .get(url)
            .header("x-apikey", &self.api_key)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }
        let summary = response.json().await?;
        Ok(EnrichmentResult {
            provider: self.name(),
            summary,
        })
    }
}

pub struct ShodanProvider {
    api_key: String,
    client: reqwest::Client,
}

impl ShodanProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EnrichmentProvider for ShodanProvider {
    fn name(&self) -> &'static str {
        "shodan"
    }

    async fn lookup(&self, _indicator_type: &str, value: &str) -> Result<EnrichmentResult, EnrichmentError> {
        let url = format!("https://api.shodan.io/shodan/host/{value}?key={}", self.api_key);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }
        let summary = response.json().await?;
        Ok(EnrichmentResult {
            provider: self.name(),
            summary,
        })
    }
}

pub struct AbuseIpDbProvider {
    api_key: String,
    client: reqwest::Client,
}

impl AbuseIpDbProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl EnrichmentProvider for AbuseIpDbProvider {
    fn name(&self) -> &'static str {
        "abuseipdb"
    }

    async fn lookup(&self, _indicator_type: &str, value: &str) -> Result<EnrichmentResult, EnrichmentError> {
        let response = self
            .client
            .get("https://api.abuseipdb.com/api/v2/check")
            .header("Key", &self.api_key)
            .query(&[("ipAddress", value)])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EnrichmentError::Status(status.as_u16()));
        }
        let summary = response.json().await?;
        Ok(EnrichmentResult {
            provider: self.name(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names_match_config_keys() {
        assert_eq!(VirusTotalProvider::new(String::new()).name(), "virustotal");
        assert_eq!(ShodanProvider::new(String::new()).name(), "shodan");
        assert_eq!(AbuseIpDbProvider::new(String::new()).name(), "abuseipdb");
    }
}
