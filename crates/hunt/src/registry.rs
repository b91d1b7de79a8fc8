// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory module registry: loads every `*.md` hunt module from a
//! directory at startup and reloads the whole set whenever the directory's
//! mtime or any known file's mtime changes. Polled rather than
//! notify-watched — module counts are small, so a from-scratch reparse on
//! every poll is simpler to reason about than incremental patching.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use thiserror::Error;
use tokio::sync::RwLock;
use warden_core::{HuntModule, HuntModuleId};

use crate::module::{parse_module, ModuleParseError};

pub const POLL_INTERVAL: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("hunt module directory not readable: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse `{path}`: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ModuleParseError,
    },
}

struct Snapshot {
    dir_mtime: SystemTime,
    file_mtimes: HashMap<PathBuf, SystemTime>,
    modules: HashMap<HuntModuleId, HuntModule>,
}

pub struct ModuleRegistry {
    dir: PathBuf,
    snapshot: RwLock<Snapshot>,
}

impl ModuleRegistry {
    pub async fn load(dir: impl Into<PathBuf>) -> Result<Self, RegistryError> {
        let dir = dir.into();
        let snapshot = load_snapshot(&dir)?;
        Ok(Self {
            dir,
            snapshot: RwLock::new(snapshot),
        })
    }

    pub async fn get(&self, id: &HuntModuleId) -> Option<HuntModule> {
        self.snapshot.read().await.modules.get(id).cloned()
    }

    pub async fn list(&self) -> Vec<HuntModule> {
        self.snapshot.read().await.modules.values().cloned().collect()
    }

    /// Re-reads directory and file mtimes; reparses the whole directory only
    /// if something changed. Returns whether a reload happened.
    pub async fn poll(&self) -> Result<bool, RegistryError> {
        let changed = {
            let current = self.snapshot.read().await;
            has_changed(&self.dir, &current)?
        };
        if !changed {
            return Ok(false);
        }
        let fresh = load_snapshot(&self.dir)?;
        *self.snapshot.write().await = fresh;
        Ok(true)
    }

    /// Runs `poll` on a loop at [`POLL_INTERVAL`] until `shutdown` fires.
    pub async fn run_poll_loop(
        &self,
        mut shutdown: tokio::sync::watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(POLL_INTERVAL) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        return;
                    }
                    continue;
                }
            }
            if let Err(e) = self.poll().await {
                tracing::warn!(error = %e, "hunt module registry reload failed");
            }
        }
    }
}

fn has_changed(dir: &Path, snapshot: &Snapshot) -> Result<bool, RegistryError> {
    let dir_mtime = std::fs::metadata(dir)?.modified()?;
    if dir_mtime != snapshot.dir_mtime {
        return Ok(true);
    }
    for (path, known_mtime) in &snapshot.file_mtimes {
        let mtime = std::fs::metadata(path).and_then(|m| m.modified());
        match mtime {
            Ok(mtime) if mtime == *known_mtime => continue,
            _ => return Ok(true),
        }
    }
    Ok(false)
}

fn load_snapshot(dir: &Path) -> Result<Snapshot, RegistryError> {
    let dir_mtime = std::fs::metadata(dir)?.modified()?;
    let mut file_mtimes = HashMap::new();
    let mut modules = HashMap::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let mtime = entry.metadata()?.modified()?;
        let source = std::fs::read_to_string(&path)?;
        let module = parse_module(&source).map_err(|source| RegistryError::Parse {
            path: path.clone(),
            source,
        })?;
        file_mtimes.insert(path, mtime);
        modules.insert(module.id.clone(), module);
    }

    Ok(Snapshot {
        dir_mtime,
        file_mtimes,
        modules,
    })
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
