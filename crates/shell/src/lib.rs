// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! warden-shell: the remote-shell engine an analyst session drives.
//!
//! Owns one outbound SSH connection per session (connect, non-interactive
//! command execution, interactive PTY, reconnect-with-backoff), the command
//! safety classifier that every AI-mode command must clear before it
//! reaches the connection, and the sudo-wrapping policy hunt steps use.

pub mod classifier;
pub mod engine;
pub mod pty;
pub mod rate_limiter;
pub mod reconnect;
pub mod sudo;

pub use classifier::{Classifier, ClassifierError, Verdict, MAX_COMMAND_BYTES};
pub use engine::{
    ConnectConfig, ExecOutput, ShellConnection, ShellError, SshCredentials,
    DEFAULT_COMMAND_TIMEOUT, DEFAULT_CONNECT_TIMEOUT, DEFAULT_KEEPALIVE_INTERVAL,
};
pub use pty::PtySession;
pub use rate_limiter::{PtyRateLimiter, FLUSH_BYTES, FLUSH_INTERVAL};
pub use reconnect::{EventSink, MonitorOutcome, BACKOFF_BASE, MAX_RECONNECT_ATTEMPTS, POLL_INTERVAL};
pub use sudo::{scrub_sudo_prompt, wrap, WrappedCommand};
