// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end CLI invocations that don't require a live Postgres instance.

use assert_cmd::Command;

fn stdout_of(cmd: &mut Command) -> String {
    String::from_utf8(cmd.output().unwrap().stdout).unwrap()
}

#[test]
fn help_lists_every_subcommand() {
    let mut cmd = Command::cargo_bin("warden").unwrap();
    cmd.arg("--help");
    let out = stdout_of(&mut cmd);
    for name in ["migrate", "asset", "hunt-module", "finding"] {
        assert!(out.contains(name), "help output missing `{name}`:\n{out}");
    }
}

#[test]
fn missing_database_url_fails_with_a_clear_error() {
    let mut cmd = Command::cargo_bin("warden").unwrap();
    cmd.env_remove("DATABASE_URL");
    cmd.arg("asset").arg("list");
    let output = cmd.output().unwrap();
    assert!(!output.status.success());
    let err = String::from_utf8(output.stderr).unwrap();
    assert!(err.contains("DATABASE_URL"));
}

#[test]
fn hunt_module_validate_accepts_a_well_formed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("module.md");
    std::fs::write(
        &path,
        "---\nid: check\nname: Check\ndescription: d\nos_types: [linux]\nseverity_hint: high\n---\n\n### step_one\n**description**: d\n**command**: `id`\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("warden").unwrap();
    cmd.arg("hunt-module").arg("validate").arg(&path);
    let out = stdout_of(&mut cmd);
    assert!(out.contains("ok:"));
}
