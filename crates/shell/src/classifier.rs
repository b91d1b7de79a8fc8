// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command safety classifier: every AI-mode command is classified SAFE,
//! SUSPECT, or BLOCKED before it reaches the remote-shell engine.
//!
//! Evaluation order: length check, deny-list, allow-prefix list, suspect
//! list, default-suspect. Verdicts are cached by exact command string in an
//! LRU-bounded cache so a flood of distinct commands can't grow memory
//! unboundedly.

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;
use regex::Regex;
use thiserror::Error;

pub const MAX_COMMAND_BYTES: usize = 4096;
const CACHE_CAPACITY: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Safe(String),
    Suspect(String),
    Blocked(String),
}

impl Verdict {
    pub fn reason(&self) -> &str {
        match self {
            Self::Safe(r) | Self::Suspect(r) | Self::Blocked(r) => r,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }

    pub fn is_suspect(&self) -> bool {
        matches!(self, Self::Suspect(_))
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("command is blocked: {0}")]
    Blocked(String),
    #[error("command requires approval (suspect): {0}")]
    ApprovalRequired(String),
}

struct RuleSet {
    deny: Vec<(Regex, &'static str)>,
    allow_prefix: Vec<(Regex, &'static str)>,
    suspect: Vec<(Regex, &'static str)>,
}

fn compile(patterns: &[(&str, &'static str)]) -> Vec<(Regex, &'static str)> {
    // Patterns are static literals authored alongside their labels; a bad
    // pattern is a compile-time-discoverable bug, not a runtime one, so we
    // simply drop it rather than panic on a malformed rule at startup.
    patterns
        .iter()
        .filter_map(|(pat, label)| Regex::new(pat).ok().map(|re| (re, *label)))
        .collect()
}

fn rules() -> &'static RuleSet {
    static RULES: std::sync::OnceLock<RuleSet> = std::sync::OnceLock::new();
    RULES.get_or_init(|| RuleSet {
        deny: compile(&[
            // destructive filesystem
            (r"rm\s+-[a-zA-Z]*r[a-zA-Z]*f?\s+/(\s|$)", "destructive filesystem: rm -rf /"),
            (r"rm\s+-[a-zA-Z]*f[a-zA-Z]*r?\s+/(\s|$)", "destructive filesystem: rm -fr /"),
            (r"mkfs\.", "destructive filesystem: mkfs"),
            (r"dd\s+if=.*of=/dev/(sd|nvme|hd|xvd)", "destructive filesystem: dd to block device"),
            (r"chmod\s+777\s+/etc/(passwd|shadow|sudoers)", "destructive filesystem: chmod on sensitive file"),
            (r"chown\s+.*\s+/etc/(passwd|shadow|sudoers)", "destructive filesystem: chown on sensitive file"),
            (r":\(\)\s*\{\s*:\s*\|\s*:\s*&?\s*;?\s*\}\s*;\s*:", "fork bomb"),
            // reverse shells
            (r"nc\s+.*-e\s*/bin/(ba)?sh", "reverse shell: nc -e"),
            (r"bash\s+-i\s*>&\s*/dev/tcp/", "reverse shell: bash -i /dev/tcp"),
            (r"/dev/tcp/\d", "reverse shell: /dev/tcp redirection"),
            (r"python[0-9.]*\s+-c\s+.*socket\.", "reverse shell: python socket one-liner"),
            // log tampering
            (r">\s*/var/log/\S+", "log tampering: truncate /var/log"),
            (r"shred\s+.*\blog\b", "log tampering: shred log file"),
            (r"history\s+-c\b", "log tampering: clear shell history"),
            (r"rm\s+.*/var/log/", "log tampering: delete log file"),
            // kernel module load
            (r"\binsmod\b", "kernel module load: insmod"),
            (r"\bmodprobe\s+(?!-r\b)", "kernel module load: modprobe"),
            // miner signatures
            (r"\bxmrig\b", "cryptominer signature: xmrig"),
            (r"stratum\+tcp", "cryptominer signature: stratum protocol"),
            // pipe-to-shell downloads
            (r"(curl|wget)[^|]*\|\s*(sudo\s+)?(ba)?sh\b", "pipe-to-shell download"),
        ]),
        allow_prefix: compile(&[
            (r"^ls\b", "Matches safe prefix: ls"),
            (r"^cat\b", "Matches safe prefix: cat"),
            (r"^grep\b", "Matches safe prefix: grep"),
            (r"^find\b(?!.*(-delete|-exec\s+rm))", "Matches safe prefix: find"),
            (r"^ps\b", "Matches safe prefix: ps"),
            (r"^(netstat|ss)\b", "Matches safe prefix: netstat/ss"),
            (r"^(who|w)\b", "Matches safe prefix: who/w"),
            (r"^uname\b", "Matches safe prefix: uname"),
            (r"^(df|du)\b", "Matches safe prefix: df/du"),
            (r"^(head|tail)\b", "Matches safe prefix: head/tail"),
            (r"^file\b", "Matches safe prefix: file"),
            (r"^stat\b", "Matches safe prefix: stat"),
            (r"^(md5sum|sha1sum|sha256sum)\b", "Matches safe prefix: checksum tool"),
            (r"^lsof\b", "Matches safe prefix: lsof"),
            (r"^id\b", "Matches safe prefix: id"),
            (r"^whoami\b", "Matches safe prefix: whoami"),
            (r"^uptime\b", "Matches safe prefix: uptime"),
            (r"^journalctl\b(?!.*(--vacuum|--rotate))", "Matches safe prefix: journalctl (read-only)"),
        ]),
        suspect: compile(&[
            (r"^(useradd|userdel|usermod|passwd)\b", "touches identity"),
            (r"^(iptables|ufw|firewalld|firewall-cmd)\b", "touches firewall"),
            (r"^systemctl\s+(start|stop|restart|enable|disable)\b", "touches services"),
            (r"^(scp|rsync)\b", "network transfer"),
            (r"^(curl|wget)\b", "network transfer"),
        ]),
    })
}

pub struct Classifier {
    cache: Mutex<LruCache<String, Verdict>>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    pub fn classify(&self, command: &str) -> Verdict {
        if let Some(cached) = self.cache.lock().get(command).cloned() {
            return cached;
        }
        let verdict = classify_uncached(command);
        self.cache.lock().put(command.to_string(), verdict.clone());
        verdict
    }
}

fn classify_uncached(command: &str) -> Verdict {
    if command.is_empty() {
        return Verdict::Blocked("empty command".to_string());
    }
    if command.len() > MAX_COMMAND_BYTES {
        return Verdict::Blocked(format!(
            "command exceeds {MAX_COMMAND_BYTES} byte limit"
        ));
    }
    let rules = rules();
    for (re, label) in &rules.deny {
        if re.is_match(command) {
            return Verdict::Blocked(label.to_string());
        }
    }
    for (re, label) in &rules.allow_prefix {
        if re.is_match(command) {
            return Verdict::Safe(label.to_string());
        }
    }
    for (re, label) in &rules.suspect {
        if re.is_match(command) {
            return Verdict::Suspect(label.to_string());
        }
    }
    Verdict::Suspect("unknown command".to_string())
}

/// Applies the gate: blocked commands are a terminal error; suspect
/// commands without `allow_suspect` are a recoverable approval-required
/// error; everything else proceeds.
pub fn gate(verdict: &Verdict, allow_suspect: bool) -> Result<(), ClassifierError> {
    match verdict {
        Verdict::Blocked(reason) => Err(ClassifierError::Blocked(reason.clone())),
        Verdict::Suspect(reason) if !allow_suspect => {
            Err(ClassifierError::ApprovalRequired(reason.clone()))
        }
        Verdict::Suspect(_) | Verdict::Safe(_) => Ok(()),
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
