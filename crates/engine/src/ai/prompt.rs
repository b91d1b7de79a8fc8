// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! System/user prompt construction for the AI streaming pipeline (§4.5).

use warden_core::Observation;

const STDOUT_PROMPT_BYTES: usize = 3 * 1024;
const STDERR_PROMPT_BYTES: usize = 500;

pub fn system_prompt() -> String {
    "You are a senior threat-hunting analyst reviewing command output collected from a live \
     incident-response session. Ground every finding in the literal observation text supplied \
     below; never speculate beyond the evidence. Prefer MITRE ATT&CK technique ids over \
     free-text tactic names. Order findings by descending severity.\n\n\
     Respond in two parts. First, a Markdown report with one `### <Finding Title>` subsection \
     per finding, each carrying `**Severity**:`, `**Confidence**:`, `**MITRE ATT&CK**:`, \
     `**Description**:`, and `**Remediation**:` lines. Second, a fenced ```json``` block with a \
     `findings` array; each element has `title`, `severity`, `confidence`, `description`, \
     `technique_ids` (array), `indicators` (array), `remediation_steps` (array), and \
     `raw_evidence`."
        .to_string()
}

/// Builds the user prompt from accumulated observations: one paragraph per
/// step, headed by its description, each command/exit-code/truncated
/// stdout+stderr.
pub fn user_prompt(observations: &[Observation]) -> String {
    let mut out = String::new();
    for observation in observations {
        let stdout = truncate_chars(&observation.stdout, STDOUT_PROMPT_BYTES);
        let stderr = truncate_chars(&observation.stderr, STDERR_PROMPT_BYTES);
        out.push_str(&format!(
            "## {}\ncommand: {}\nexit_code: {}\nstdout:\n{}\nstderr:\n{}\n\n",
            observation.step_id, observation.command, observation.exit_code, stdout, stderr,
        ));
    }
    out
}

fn truncate_chars(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;
