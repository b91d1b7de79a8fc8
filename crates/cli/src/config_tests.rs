// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serial_test::serial;

use super::*;

fn clear_env() {
    std::env::remove_var("DATABASE_URL");
    std::env::remove_var("HUNT_MODULE_DIR");
}

#[test]
#[serial]
fn load_fails_without_database_url() {
    clear_env();
    assert!(matches!(Config::load(), Err(ConfigError::MissingVar("DATABASE_URL"))));
}

#[test]
#[serial]
fn load_defaults_hunt_module_dir_when_unset() {
    clear_env();
    std::env::set_var("DATABASE_URL", "postgres://localhost/warden");
    let config = Config::load().unwrap();
    assert_eq!(config.hunt_module_dir, DEFAULT_HUNT_MODULE_DIR);
    clear_env();
}

#[test]
#[serial]
fn load_honors_explicit_hunt_module_dir() {
    clear_env();
    std::env::set_var("DATABASE_URL", "postgres://localhost/warden");
    std::env::set_var("HUNT_MODULE_DIR", "/etc/warden/modules");
    let config = Config::load().unwrap();
    assert_eq!(config.hunt_module_dir, "/etc/warden/modules");
    clear_env();
}
