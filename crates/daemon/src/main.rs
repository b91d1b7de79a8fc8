// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! warden-daemon (wardend)
//!
//! Background process that owns live sessions, the event bus, and the
//! periodic reaper/registry-reload tasks. The HTTP/REST and WebSocket
//! surfaces described in the external interfaces are treated as external
//! collaborators of this binary, not built here.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::sync::Arc;

use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{error, info};
use warden_core::SystemClock;
use warden_hunt::ModuleRegistry;

use warden_daemon::{Config, EventBus, SessionManager};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load().map_err(|e| {
        error!(error = %e, "fatal configuration error");
        e
    })?;

    info!(max_sessions = config.max_sessions, "starting warden-daemon");

    let session_manager = Arc::new(SessionManager::new(SystemClock, config.max_sessions));
    let event_bus = Arc::new(EventBus::new(config.event_queue_depth));
    let module_registry = Arc::new(
        ModuleRegistry::load(&config.hunt_module_dir)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to load hunt module directory");
                e
            })?,
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reap_handle = {
        let session_manager = Arc::clone(&session_manager);
        let shutdown_rx = shutdown_rx.clone();
        tokio::spawn(async move { session_manager.run_reap_loop(shutdown_rx).await })
    };
    let registry_handle = {
        let module_registry = Arc::clone(&module_registry);
        let shutdown_rx = shutdown_rx.clone();
        tokio::spawn(async move { module_registry.run_poll_loop(shutdown_rx).await })
    };

    let _ = Arc::clone(&event_bus);
    wait_for_shutdown_signal().await?;
    info!("shutdown signal received, draining background tasks");
    let _ = shutdown_tx.send(true);

    let _ = tokio::join!(reap_handle, registry_handle);
    info!("warden-daemon exited cleanly");
    Ok(())
}

async fn wait_for_shutdown_signal() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => {}
        _ = sigint.recv() => {}
    }
    Ok(())
}
