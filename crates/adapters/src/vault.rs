// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Vault client: AppRole authentication, then a secret read at a given
//! path. The vault backend itself is an external collaborator; only this
//! client call is in scope (§4.3).

use serde::Deserialize;
use thiserror::Error;
use warden_core::SudoMethod;

use crate::credential::CredentialBundle;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("vault authentication failed: {0}")]
    Auth(String),
    #[error("vault request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("vault secret at `{0}` is missing required fields")]
    MalformedSecret(String),
}

#[derive(Debug, Deserialize)]
struct AppRoleLoginResponse {
    auth: AppRoleAuth,
}

#[derive(Debug, Deserialize)]
struct AppRoleAuth {
    client_token: String,
}

#[derive(Debug, Deserialize)]
struct SecretResponse {
    data: SecretData,
}

#[derive(Debug, Deserialize)]
struct SecretData {
    data: SecretFields,
}

#[derive(Debug, Deserialize)]
struct SecretFields {
    username: Option<String>,
    ssh_key: Option<String>,
    ssh_password: Option<String>,
    sudo_method: Option<String>,
    sudo_password: Option<String>,
}

pub struct VaultClient {
    addr: String,
    role_id: String,
    secret_id: String,
    client: reqwest::Client,
}

impl VaultClient {
    pub fn new(addr: String, role_id: String, secret_id: String) -> Self {
        Self {
            addr,
            role_id,
            secret_id,
            client: reqwest::Client::new(),
        }
    }

    async fn login(&self) -> Result<String, VaultError> {
        let url = format!("{}/v1/auth/approle/login", self.addr.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({
                "role_id": self.role_id,
                "secret_id": self.secret_id,
            }))
            .send()
            .await?
            .error_for_status()
            .map_err(|e| VaultError::Auth(e.to_string()))?;
        let body: AppRoleLoginResponse = response.json().await?;
        Ok(body.auth.client_token)
    }

    pub async fn read_secret(&self, path: &str) -> Result<CredentialBundle, VaultError> {
        let token = self.login().await?;
        let url = format!("{}/v1/{}", self.addr.trim_end_matches('/'), path.trim_start_matches('/'));
        let response = self
            .client
            .get(url)
            .header("X-Vault-Token", token)
            .send()
            .await?
            .error_for_status()?;
        let body: SecretResponse = response.json().await?;
        let fields = body.data.data;

        let username = fields
            .username
            .ok_or_else(|| VaultError::MalformedSecret(path.to_string()))?;
        let sudo_method = fields
            .sudo_method
            .as_deref()
            .map(SudoMethod::parse_lossy)
            .unwrap_or(SudoMethod::None);

        Ok(CredentialBundle {
            username,
            ssh_key: fields.ssh_key,
            ssh_password: fields.ssh_password,
            sudo_method,
            sudo_password: fields.sudo_password,
        })
    }
}
