// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn row_conversion_defaults_unrecognised_enums_without_panicking() {
    let row = AssetRow {
        id: "asset-1".to_string(),
        hostname: "host1".to_string(),
        ip_address: "10.0.0.1".to_string(),
        os_tag: "bsd".to_string(),
        tags: serde_json::json!({"env": "prod"}),
        username: Some("root".to_string()),
        ssh_key_ciphertext: None,
        ssh_password_ciphertext: None,
        sudo_method: Some("garbage".to_string()),
        sudo_password_ciphertext: None,
    };
    let asset: Asset = row.into();
    assert_eq!(asset.os_tag, OsTag::Unknown);
    assert_eq!(asset.credentials.sudo_method, Some(SudoMethod::None));
    assert_eq!(asset.tags.get("env").map(String::as_str), Some("prod"));
}

#[test]
fn row_conversion_preserves_known_enums() {
    let row = AssetRow {
        id: "asset-2".to_string(),
        hostname: "host2".to_string(),
        ip_address: "10.0.0.2".to_string(),
        os_tag: "linux".to_string(),
        tags: serde_json::json!({}),
        username: None,
        ssh_key_ciphertext: None,
        ssh_password_ciphertext: None,
        sudo_method: Some("nopasswd".to_string()),
        sudo_password_ciphertext: None,
    };
    let asset: Asset = row.into();
    assert_eq!(asset.os_tag, OsTag::Linux);
    assert_eq!(asset.credentials.sudo_method, Some(SudoMethod::Nopasswd));
}
