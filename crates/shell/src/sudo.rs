// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sudo policy: wraps a hunt step's command per the asset's configured
//! sudo method, and derives which password (if any) must ride along on
//! stdin.

use warden_core::SudoMethod;

/// A command ready to execute, plus the stdin payload (if any) the sudo
/// wrapping requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedCommand {
    pub command: String,
    pub stdin_password: Option<String>,
}

/// Wraps `command` per `method`, given the SSH login password and the
/// asset's custom sudo password (either may be absent). Commands already
/// starting with `sudo ` are left untouched — the caller already opted in.
pub fn wrap(
    command: &str,
    requires_sudo: bool,
    method: SudoMethod,
    ssh_password: Option<&str>,
    custom_sudo_password: Option<&str>,
) -> WrappedCommand {
    if !requires_sudo || command.trim_start().starts_with("sudo ") {
        return WrappedCommand {
            command: command.to_string(),
            stdin_password: None,
        };
    }
    match method {
        SudoMethod::None => WrappedCommand {
            command: command.to_string(),
            stdin_password: None,
        },
        SudoMethod::Nopasswd => WrappedCommand {
            command: format!("sudo -n {command}"),
            stdin_password: None,
        },
        SudoMethod::SshPassword => WrappedCommand {
            command: format!("sudo -S {command}"),
            stdin_password: ssh_password.map(str::to_string),
        },
        SudoMethod::CustomPassword => WrappedCommand {
            command: format!("sudo -S {command}"),
            stdin_password: custom_sudo_password.map(str::to_string),
        },
    }
}

/// The literal prompt line `sudo -S` writes to stderr, scrubbed from
/// returned output so the password's username context never leaks into a
/// persisted observation.
pub fn scrub_sudo_prompt(stderr: &str, username: &str) -> String {
    let prompt_re = format!(r"(?m)^\[sudo\] password for {}:\s*\n?", regex::escape(username));
    match regex::Regex::new(&prompt_re) {
        Ok(re) => re.replace_all(stderr, "").into_owned(),
        Err(_) => stderr.to_string(),
    }
}

#[cfg(test)]
#[path = "sudo_tests.rs"]
mod tests;
