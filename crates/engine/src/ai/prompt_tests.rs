// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use warden_core::HuntStepId;

use super::*;

#[test]
fn system_prompt_states_the_analyst_persona() {
    let prompt = system_prompt();
    assert!(prompt.contains("senior threat-hunting analyst"));
    assert!(prompt.contains("```json"));
}

#[test]
fn user_prompt_truncates_stdout_and_stderr() {
    let observation = Observation {
        step_id: HuntStepId::new("step-1"),
        command: "cat /etc/passwd".to_string(),
        stdout: "a".repeat(4000),
        stderr: "b".repeat(1000),
        exit_code: 0,
        truncated: false,
    };
    let prompt = user_prompt(&[observation]);
    let stdout_section = prompt.split("stdout:\n").nth(1).unwrap().split("\nstderr:").next().unwrap();
    assert_eq!(stdout_section.len(), STDOUT_PROMPT_BYTES);
}

#[test]
fn user_prompt_includes_one_paragraph_per_step() {
    let observations = vec![
        Observation {
            step_id: HuntStepId::new("step-1"),
            command: "ls".to_string(),
            stdout: "x".to_string(),
            stderr: String::new(),
            exit_code: 0,
            truncated: false,
        },
        Observation {
            step_id: HuntStepId::new("step-2"),
            command: "ps".to_string(),
            stdout: "y".to_string(),
            stderr: String::new(),
            exit_code: 0,
            truncated: false,
        },
    ];
    let prompt = user_prompt(&observations);
    assert!(prompt.contains("step-1"));
    assert!(prompt.contains("step-2"));
}
