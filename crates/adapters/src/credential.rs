// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Credential encryption-at-rest and the resolver that turns a vault path
//! or an asset's encrypted fields into a plaintext bundle (§4.3).

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use sha2::{Digest, Sha256};
use thiserror::Error;
use warden_core::{Asset, EncryptedCredentials, SudoMethod};

use crate::vault::{VaultClient, VaultError};

const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("ciphertext is too short to contain a nonce")]
    Truncated,
    #[error("decryption failed: ciphertext does not match the process key")]
    DecryptFailed,
    #[error("vault mode is enabled but asset has no vault_path configured")]
    MissingVaultPath,
    #[error("vault lookup failed: {0}")]
    Vault(#[from] VaultError),
    #[error("no credential source yielded a username/secret for this asset")]
    NoCredentialSource,
}

/// Derives the AES-256 key from the process secret. Callers should derive
/// this once and reuse it; it's cheap enough here to not bother caching.
fn derive_key(process_secret: &str) -> Key<Aes256Gcm> {
    let digest = Sha256::digest(process_secret.as_bytes());
    *Key::<Aes256Gcm>::from_slice(&digest)
}

/// Encrypts `plaintext` with a fresh random 96-bit nonce, returning
/// `nonce || ciphertext`. Encrypting the same plaintext twice yields
/// distinct output because the nonce is random each call.
pub fn encrypt(process_secret: &str, plaintext: &str) -> Vec<u8> {
    let key = derive_key(process_secret);
    let cipher = Aes256Gcm::new(&key);
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    // aes-gcm only fails on oversized plaintext; credentials are short strings.
    let ciphertext = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .unwrap_or_default();
    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    out
}

pub fn decrypt(process_secret: &str, blob: &[u8]) -> Result<String, CredentialError> {
    if blob.len() < NONCE_LEN {
        return Err(CredentialError::Truncated);
    }
    let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
    let key = derive_key(process_secret);
    let cipher = Aes256Gcm::new(&key);
    let nonce = Nonce::from_slice(nonce_bytes);
    let plaintext = cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| CredentialError::DecryptFailed)?;
    String::from_utf8(plaintext).map_err(|_| CredentialError::DecryptFailed)
}

/// Plaintext credential bundle the remote-shell engine connects with. Never
/// persisted; lives only in transient memory for the duration of a session.
#[derive(Debug, Clone)]
pub struct CredentialBundle {
    pub username: String,
    pub ssh_key: Option<String>,
    pub ssh_password: Option<String>,
    pub sudo_method: SudoMethod,
    pub sudo_password: Option<String>,
}

pub struct CredentialResolver {
    process_secret: String,
    vault: Option<VaultClient>,
}

impl CredentialResolver {
    pub fn new(process_secret: String, vault: Option<VaultClient>) -> Self {
        Self {
            process_secret,
            vault,
        }
    }

    /// Resolves credentials for `asset`, trying vault first (when enabled
    /// and `vault_path` is set), then the asset's encrypted fields, then
    /// dev-mode environment variables.
    pub async fn resolve(
        &self,
        asset: &Asset,
        vault_path: Option<&str>,
    ) -> Result<CredentialBundle, CredentialError> {
        if let Some(vault) = &self.vault {
            let path = vault_path.ok_or(CredentialError::MissingVaultPath)?;
            return vault.read_secret(path).await.map_err(CredentialError::from);
        }

        if let Some(bundle) = self.from_encrypted_fields(asset)? {
            return Ok(bundle);
        }

        self.from_env(asset).ok_or(CredentialError::NoCredentialSource)
    }

    fn from_encrypted_fields(
        &self,
        asset: &Asset,
    ) -> Result<Option<CredentialBundle>, CredentialError> {
        let creds: &EncryptedCredentials = &asset.credentials;
        let Some(username) = creds.username.clone() else {
            return Ok(None);
        };

        let ssh_key = creds
            .ssh_key_ciphertext
            .as_ref()
            .map(|blob| decrypt(&self.process_secret, blob))
            .transpose()?;
        let ssh_password = creds
            .ssh_password_ciphertext
            .as_ref()
            .map(|blob| decrypt(&self.process_secret, blob))
            .transpose()?;
        let sudo_method = creds.sudo_method.unwrap_or(SudoMethod::None);
        let custom_sudo_password = creds
            .sudo_password_ciphertext
            .as_ref()
            .map(|blob| decrypt(&self.process_secret, blob))
            .transpose()?;

        let sudo_password =
            derive_sudo_password(sudo_method, ssh_password.as_deref(), custom_sudo_password.as_deref());

        Ok(Some(CredentialBundle {
            username,
            ssh_key,
            ssh_password,
            sudo_method,
            sudo_password,
        }))
    }

    fn from_env(&self, asset: &Asset) -> Option<CredentialBundle> {
        let prefix = format!("ASSET_{}_SSH", asset.id.as_str());
        let username = std::env::var(format!("{prefix}_USERNAME")).ok()?;
        let ssh_key = std::env::var(format!("{prefix}_KEY")).ok();
        let ssh_password = std::env::var(format!("{prefix}_PASSWORD")).ok();
        let sudo_method = asset.credentials.sudo_method.unwrap_or(SudoMethod::None);
        let sudo_password = derive_sudo_password(sudo_method, ssh_password.as_deref(), None);

        Some(CredentialBundle {
            username,
            ssh_key,
            ssh_password,
            sudo_method,
            sudo_password,
        })
    }
}

/// §4.3's derived sudo-password rule: `ssh_password` method reuses the SSH
/// login password; `custom_password` uses the decrypted custom field;
/// anything else has no sudo password.
fn derive_sudo_password(
    method: SudoMethod,
    ssh_password: Option<&str>,
    custom_password: Option<&str>,
) -> Option<String> {
    match method {
        SudoMethod::SshPassword => ssh_password.map(str::to_string),
        SudoMethod::CustomPassword => custom_password.map(str::to_string),
        SudoMethod::None | SudoMethod::Nopasswd => None,
    }
}

#[cfg(test)]
#[path = "credential_tests.rs"]
mod tests;
