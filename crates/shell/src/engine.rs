// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote-shell engine: one outbound SSH connection per session.
//!
//! The connection is owned by a single blocking task (an "actor") that
//! serialises every libssh2 call onto one OS thread — `ssh2::Session` and
//! its channels are not safe to drive concurrently from multiple threads,
//! and the spec's command/mode mutexes already guarantee at most one
//! exec/PTY operation is in flight per session at a time, so a simple
//! request/reply channel into a dedicated thread is sufficient rather than
//! a connection pool.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use ssh2::Session;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("connection actor is gone")]
    ActorGone,
    #[error("pty already open on this connection")]
    PtyAlreadyOpen,
    #[error("no pty open on this connection")]
    NoPtyOpen,
}

#[derive(Debug, Clone)]
pub struct SshCredentials {
    pub username: String,
    pub ssh_key_pem: Option<Vec<u8>>,
    pub ssh_password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConnectConfig {
    pub host: String,
    pub port: u16,
    pub connect_timeout: Duration,
    pub keepalive_interval: Duration,
}

#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

enum ConnectionRequest {
    Exec {
        command: String,
        timeout: Duration,
        stdin: Option<String>,
        reply: oneshot::Sender<Result<ExecOutput, ShellError>>,
    },
    OpenPty {
        term: String,
        cols: u32,
        rows: u32,
        reply: oneshot::Sender<Result<(), ShellError>>,
    },
    PtyWrite {
        data: Vec<u8>,
        reply: oneshot::Sender<Result<(), ShellError>>,
    },
    PtyResize {
        cols: u32,
        rows: u32,
        reply: oneshot::Sender<Result<(), ShellError>>,
    },
    PtyRead {
        reply: oneshot::Sender<Result<Vec<u8>, ShellError>>,
    },
    ClosePty {
        reply: oneshot::Sender<Result<(), ShellError>>,
    },
    Ping {
        reply: oneshot::Sender<bool>,
    },
}

/// A handle to a live connection actor. Cloning shares the same underlying
/// connection; only one handle should drive PTY/exec operations at a time,
/// which the session's mode mutex (owned by the daemon crate) enforces.
#[derive(Clone)]
pub struct ShellConnection {
    tx: mpsc::Sender<ConnectionRequest>,
    pub fingerprint: String,
}

impl ShellConnection {
    /// Connects synchronously on a blocking thread and spawns the actor
    /// loop. Host-key verification is intentionally not performed — TOFU is
    /// explicitly deferred per the design notes.
    pub async fn connect(
        config: ConnectConfig,
        creds: SshCredentials,
    ) -> Result<Self, ShellError> {
        let (ready_tx, ready_rx) = oneshot::channel();
        let (tx, rx) = mpsc::channel(16);

        std::thread::Builder::new()
            .name("warden-ssh-actor".to_string())
            .spawn(move || run_actor(config, creds, ready_tx, rx))
            .map_err(|e| ShellError::Transport(e.to_string()))?;

        match ready_rx.await {
            Ok(Ok(fingerprint)) => Ok(Self { tx, fingerprint }),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(ShellError::ActorGone),
        }
    }

    pub async fn exec(
        &self,
        command: &str,
        timeout: Duration,
        stdin: Option<String>,
    ) -> Result<ExecOutput, ShellError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ConnectionRequest::Exec {
                command: command.to_string(),
                timeout,
                stdin,
                reply,
            })
            .await
            .map_err(|_| ShellError::ActorGone)?;
        rx.await.map_err(|_| ShellError::ActorGone)?
    }

    pub async fn open_pty(&self, term: &str, cols: u32, rows: u32) -> Result<(), ShellError> {
        self.roundtrip(|reply| ConnectionRequest::OpenPty {
            term: term.to_string(),
            cols,
            rows,
            reply,
        })
        .await
    }

    pub async fn pty_write(&self, data: Vec<u8>) -> Result<(), ShellError> {
        self.roundtrip(|reply| ConnectionRequest::PtyWrite { data, reply })
            .await
    }

    pub async fn pty_resize(&self, cols: u32, rows: u32) -> Result<(), ShellError> {
        self.roundtrip(|reply| ConnectionRequest::PtyResize { cols, rows, reply })
            .await
    }

    /// Non-blocking drain of whatever PTY output has arrived since the last
    /// read. Returns an empty vec when there is nothing new.
    pub async fn pty_read(&self) -> Result<Vec<u8>, ShellError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(ConnectionRequest::PtyRead { reply })
            .await
            .map_err(|_| ShellError::ActorGone)?;
        rx.await.map_err(|_| ShellError::ActorGone)?
    }

    pub async fn close_pty(&self) -> Result<(), ShellError> {
        self.roundtrip(|reply| ConnectionRequest::ClosePty { reply })
            .await
    }

    /// Liveness probe used by the reconnect monitor (§4.2).
    pub async fn is_alive(&self) -> bool {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(ConnectionRequest::Ping { reply }).await.is_err() {
            return false;
        }
        rx.await.unwrap_or(false)
    }

    async fn roundtrip<F>(&self, make: F) -> Result<(), ShellError>
    where
        F: FnOnce(oneshot::Sender<Result<(), ShellError>>) -> ConnectionRequest,
    {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(make(reply))
            .await
            .map_err(|_| ShellError::ActorGone)?;
        rx.await.map_err(|_| ShellError::ActorGone)?
    }
}

fn run_actor(
    config: ConnectConfig,
    creds: SshCredentials,
    ready_tx: oneshot::Sender<Result<String, ShellError>>,
    mut rx: mpsc::Receiver<ConnectionRequest>,
) {
    let mut session = match do_connect(&config, &creds) {
        Ok((session, fingerprint)) => {
            let _ = ready_tx.send(Ok(fingerprint));
            session
        }
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    let mut pty_channel: Option<ssh2::Channel> = None;

    while let Some(request) = rx.blocking_recv() {
        match request {
            ConnectionRequest::Exec {
                command,
                timeout,
                stdin,
                reply,
            } => {
                let _ = reply.send(exec_blocking(&mut session, &command, timeout, stdin));
            }
            ConnectionRequest::OpenPty {
                term,
                cols,
                rows,
                reply,
            } => {
                if pty_channel.is_some() {
                    let _ = reply.send(Err(ShellError::PtyAlreadyOpen));
                    continue;
                }
                let result = open_pty_blocking(&session, &term, cols, rows);
                match result {
                    Ok(channel) => {
                        pty_channel = Some(channel);
                        let _ = reply.send(Ok(()));
                    }
                    Err(e) => {
                        let _ = reply.send(Err(e));
                    }
                }
            }
            ConnectionRequest::PtyWrite { data, reply } => {
                let result = match pty_channel.as_mut() {
                    Some(channel) => channel
                        .write_all(&data)
                        .map_err(|e| ShellError::Transport(e.to_string())),
                    None => Err(ShellError::NoPtyOpen),
                };
                let _ = reply.send(result);
            }
            ConnectionRequest::PtyResize { cols, rows, reply } => {
                let result = match pty_channel.as_mut() {
                    Some(channel) => channel
                        .request_pty_size(cols, rows, None, None)
                        .map_err(|e| ShellError::Transport(e.to_string())),
                    None => Err(ShellError::NoPtyOpen),
                };
                let _ = reply.send(result);
            }
            ConnectionRequest::PtyRead { reply } => {
                let result = match pty_channel.as_mut() {
                    Some(channel) => read_available(channel),
                    None => Err(ShellError::NoPtyOpen),
                };
                let _ = reply.send(result);
            }
            ConnectionRequest::ClosePty { reply } => {
                if let Some(mut channel) = pty_channel.take() {
                    let _ = channel.close();
                    let _ = channel.wait_close();
                }
                let _ = reply.send(Ok(()));
            }
            ConnectionRequest::Ping { reply } => {
                let alive = session.authenticated();
                let _ = reply.send(alive);
            }
        }
    }
}

fn do_connect(
    config: &ConnectConfig,
    creds: &SshCredentials,
) -> Result<(Session, String), ShellError> {
    let addr = format!("{}:{}", config.host, config.port);
    let started = Instant::now();
    let tcp = TcpStream::connect(&addr).map_err(|e| ShellError::Transport(e.to_string()))?;
    tcp.set_read_timeout(Some(config.connect_timeout))
        .map_err(|e| ShellError::Transport(e.to_string()))?;

    let mut session = Session::new().map_err(|e| ShellError::Transport(e.to_string()))?;
    session.set_tcp_stream(tcp);
    session.set_keepalive(true, config.keepalive_interval.as_secs() as u32);
    session
        .handshake()
        .map_err(|e| ShellError::Transport(e.to_string()))?;

    if started.elapsed() > config.connect_timeout {
        return Err(ShellError::ConnectTimeout(config.connect_timeout));
    }

    // Host-key verification intentionally skipped here: TOFU is explicitly
    // deferred (design notes open question).
    let fingerprint = session
        .host_key()
        .map(|(key, _)| hex_fingerprint(key))
        .unwrap_or_default();

    authenticate(&mut session, creds)?;

    Ok((session, fingerprint))
}

fn authenticate(session: &mut Session, creds: &SshCredentials) -> Result<(), ShellError> {
    if let Some(key_pem) = &creds.ssh_key_pem {
        let key_str = std::str::from_utf8(key_pem)
            .map_err(|e| ShellError::Auth(format!("key is not valid UTF-8 PEM: {e}")))?;
        session
            .userauth_pubkey_memory(&creds.username, None, key_str, None)
            .map_err(|e| ShellError::Auth(e.to_string()))?;
    } else if let Some(password) = &creds.ssh_password {
        session
            .userauth_password(&creds.username, password)
            .map_err(|e| ShellError::Auth(e.to_string()))?;
    } else {
        return Err(ShellError::Auth("no credential supplied".to_string()));
    }
    if !session.authenticated() {
        return Err(ShellError::Auth("authentication rejected".to_string()));
    }
    Ok(())
}

fn hex_fingerprint(key_bytes: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(key_bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn exec_blocking(
    session: &mut Session,
    command: &str,
    timeout: Duration,
    stdin: Option<String>,
) -> Result<ExecOutput, ShellError> {
    let mut channel = session
        .channel_session()
        .map_err(|e| ShellError::Transport(e.to_string()))?;
    channel
        .exec(command)
        .map_err(|e| ShellError::Transport(e.to_string()))?;

    if let Some(password) = stdin {
        let _ = channel.write_all(format!("{password}\n").as_bytes());
    }

    let started = Instant::now();
    let mut stdout = String::new();
    let mut stderr = String::new();
    channel.set_blocking(false);
    loop {
        let mut out_buf = [0u8; 4096];
        match channel.read(&mut out_buf) {
            Ok(0) => {}
            Ok(n) => stdout.push_str(&String::from_utf8_lossy(&out_buf[..n])),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(_) => {}
        }
        let mut err_buf = [0u8; 4096];
        match channel.stderr().read(&mut err_buf) {
            Ok(0) => {}
            Ok(n) => stderr.push_str(&String::from_utf8_lossy(&err_buf[..n])),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(_) => {}
        }

        if channel.eof() {
            break;
        }
        if started.elapsed() > timeout {
            return Ok(ExecOutput {
                stdout,
                stderr: format!("timed out after {}s", timeout.as_secs()),
                exit_code: -1,
            });
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    channel.set_blocking(true);
    let _ = channel.close();
    let _ = channel.wait_close();
    let exit_code = channel.exit_status().unwrap_or(-1);

    Ok(ExecOutput {
        stdout,
        stderr,
        exit_code,
    })
}

fn open_pty_blocking(
    session: &Session,
    term: &str,
    cols: u32,
    rows: u32,
) -> Result<ssh2::Channel, ShellError> {
    let mut channel = session
        .channel_session()
        .map_err(|e| ShellError::Transport(e.to_string()))?;
    channel
        .request_pty(term, None, Some((cols, rows, 0, 0)))
        .map_err(|e| ShellError::Transport(e.to_string()))?;
    channel
        .shell()
        .map_err(|e| ShellError::Transport(e.to_string()))?;
    channel.set_blocking(false);
    Ok(channel)
}

fn read_available(channel: &mut ssh2::Channel) -> Result<Vec<u8>, ShellError> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        match channel.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => break,
            Err(e) => return Err(ShellError::Transport(e.to_string())),
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timeouts_match_spec() {
        assert_eq!(DEFAULT_CONNECT_TIMEOUT, Duration::from_secs(30));
        assert_eq!(DEFAULT_KEEPALIVE_INTERVAL, Duration::from_secs(30));
        assert_eq!(DEFAULT_COMMAND_TIMEOUT, Duration::from_secs(30));
    }
}
