// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Asset: a target host under observation, and its credential bundle.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Unique identifier for a target asset.
    pub struct AssetId;
}

/// Coarse OS family, used to scope which hunt modules apply to an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsTag {
    Linux,
    Windows,
    Macos,
    Unknown,
}

impl OsTag {
    /// Parses the persisted string form, falling back to `Unknown` on anything
    /// unrecognised rather than failing the caller — enum/string coercion at
    /// this boundary must never panic on a value the DB or an LLM produced.
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "linux" => Self::Linux,
            "windows" => Self::Windows,
            "macos" | "darwin" => Self::Macos,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
            Self::Macos => "macos",
            Self::Unknown => "unknown",
        }
    }
}

/// How privilege escalation is invoked for a given asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SudoMethod {
    None,
    Nopasswd,
    SshPassword,
    CustomPassword,
}

impl SudoMethod {
    pub fn parse_lossy(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "nopasswd" => Self::Nopasswd,
            "ssh_password" => Self::SshPassword,
            "custom_password" => Self::CustomPassword,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Nopasswd => "nopasswd",
            Self::SshPassword => "ssh_password",
            Self::CustomPassword => "custom_password",
        }
    }
}

/// Credential fields as stored on the asset record. Sensitive fields are
/// ciphertext + nonce pairs; only the credential resolver ever turns these
/// into plaintext, and only in transient memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptedCredentials {
    pub username: Option<String>,
    pub ssh_key_ciphertext: Option<Vec<u8>>,
    pub ssh_password_ciphertext: Option<Vec<u8>>,
    pub sudo_method: Option<SudoMethod>,
    pub sudo_password_ciphertext: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub hostname: String,
    pub ip_address: String,
    pub os_tag: OsTag,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub credentials: EncryptedCredentials,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_tag_parse_lossy_defaults_to_unknown() {
        assert_eq!(OsTag::parse_lossy("Linux"), OsTag::Linux);
        assert_eq!(OsTag::parse_lossy("bsd"), OsTag::Unknown);
    }

    #[test]
    fn sudo_method_parse_lossy_defaults_to_none() {
        assert_eq!(SudoMethod::parse_lossy("ssh_password"), SudoMethod::SshPassword);
        assert_eq!(SudoMethod::parse_lossy("garbage"), SudoMethod::None);
    }
}
