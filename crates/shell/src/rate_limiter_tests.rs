// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn small_chunk_does_not_flush_immediately() {
    let mut limiter = PtyRateLimiter::new();
    assert!(limiter.push(b"hello").is_none());
}

#[test]
fn reaching_flush_bytes_flushes() {
    let mut limiter = PtyRateLimiter::new();
    let chunk = vec![b'a'; FLUSH_BYTES];
    let flushed = limiter.push(&chunk);
    assert!(flushed.is_some());
}

#[test]
fn time_based_flush_after_interval() {
    let mut limiter = PtyRateLimiter::new();
    assert!(limiter.push(b"x").is_none());
    std::thread::sleep(FLUSH_INTERVAL + Duration::from_millis(5));
    let flushed = limiter.push(&[]);
    assert!(flushed.is_some());
}

#[test]
fn flushed_payload_is_valid_base64_of_input() {
    use base64::Engine;
    let mut limiter = PtyRateLimiter::new();
    let chunk = vec![b'z'; FLUSH_BYTES];
    let flushed = limiter.push(&chunk).expect("should flush at threshold");
    let decoded = base64::engine::general_purpose::STANDARD
        .decode(flushed)
        .expect("valid base64");
    assert_eq!(decoded, chunk);
}

#[test]
fn empty_buffer_produces_no_flush_on_time_check() {
    let mut limiter = PtyRateLimiter::new();
    assert!(limiter.push(&[]).is_none());
}
