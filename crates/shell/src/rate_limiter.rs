// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! PTY output rate-limiter: coalesces raw terminal bytes into `terminal.data`
//! events at a bounded rate, so a command that prints a firehose of output
//! doesn't turn into one event bus message per read() call. Bytes are
//! flushed whichever comes first: the buffer reaches [`FLUSH_BYTES`] or
//! [`FLUSH_INTERVAL`] has elapsed since the first unflushed byte arrived.

use std::time::{Duration, Instant};

pub const FLUSH_BYTES: usize = 8 * 1024;
pub const FLUSH_INTERVAL: Duration = Duration::from_millis(16);

pub struct PtyRateLimiter {
    buffer: Vec<u8>,
    first_byte_at: Option<Instant>,
}

impl Default for PtyRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl PtyRateLimiter {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(FLUSH_BYTES),
            first_byte_at: None,
        }
    }

    /// Appends freshly-read bytes. Returns a coalesced chunk, base64-encoded,
    /// if a flush threshold was crossed.
    pub fn push(&mut self, data: &[u8]) -> Option<String> {
        if data.is_empty() {
            return self.maybe_flush_on_time();
        }
        if self.first_byte_at.is_none() {
            self.first_byte_at = Some(Instant::now());
        }
        self.buffer.extend_from_slice(data);
        if self.buffer.len() >= FLUSH_BYTES {
            return Some(self.drain());
        }
        self.maybe_flush_on_time()
    }

    fn maybe_flush_on_time(&mut self) -> Option<String> {
        let elapsed = self.first_byte_at.map(|t| t.elapsed()).unwrap_or_default();
        if !self.buffer.is_empty() && elapsed >= FLUSH_INTERVAL {
            Some(self.drain())
        } else {
            None
        }
    }

    fn drain(&mut self) -> String {
        use base64::Engine;
        self.first_byte_at = None;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.buffer);
        self.buffer.clear();
        encoded
    }
}

#[cfg(test)]
#[path = "rate_limiter_tests.rs"]
mod tests;
