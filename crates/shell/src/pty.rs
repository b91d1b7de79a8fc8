// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interactive PTY session: pairs a connection's PTY channel with the
//! output rate-limiter so callers get pre-coalesced, base64-encoded chunks
//! ready to carry as `terminal.data` events. One PTY per connection;
//! closing it hands the session back to `ai` mode.

use crate::engine::{ShellConnection, ShellError};
use crate::rate_limiter::PtyRateLimiter;

pub const DEFAULT_TERM: &str = "xterm-256color";

pub struct PtySession {
    connection: ShellConnection,
    limiter: PtyRateLimiter,
}

impl PtySession {
    pub async fn open(
        connection: ShellConnection,
        cols: u32,
        rows: u32,
    ) -> Result<Self, ShellError> {
        connection.open_pty(DEFAULT_TERM, cols, rows).await?;
        Ok(Self {
            connection,
            limiter: PtyRateLimiter::new(),
        })
    }

    pub async fn write(&self, data: Vec<u8>) -> Result<(), ShellError> {
        self.connection.pty_write(data).await
    }

    pub async fn resize(&self, cols: u32, rows: u32) -> Result<(), ShellError> {
        self.connection.pty_resize(cols, rows).await
    }

    /// Polls the connection for fresh PTY bytes and feeds them through the
    /// rate limiter, returning a coalesced chunk once a flush threshold is
    /// crossed. Intended to be called in a tight poll loop by the session
    /// task that owns this PTY.
    pub async fn poll(&mut self) -> Result<Option<String>, ShellError> {
        let bytes = self.connection.pty_read().await?;
        Ok(self.limiter.push(&bytes))
    }

    pub async fn close(self) -> Result<(), ShellError> {
        self.connection.close_pty().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_term_is_xterm_256color() {
        assert_eq!(DEFAULT_TERM, "xterm-256color");
    }
}
