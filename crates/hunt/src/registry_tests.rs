// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

const MODULE_A: &str = "---\nid: module-a\nname: A\ndescription: d\n---\n\n### s\n**command**: `ls`\n";
const MODULE_B: &str = "---\nid: module-b\nname: B\ndescription: d\n---\n\n### s\n**command**: `id`\n";

#[tokio::test]
async fn loads_every_md_file_in_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.md"), MODULE_A).expect("write a");
    std::fs::write(dir.path().join("b.md"), MODULE_B).expect("write b");
    std::fs::write(dir.path().join("notes.txt"), "ignored").expect("write notes");

    let registry = ModuleRegistry::load(dir.path()).await.expect("load registry");
    let modules = registry.list().await;
    assert_eq!(modules.len(), 2);
}

#[tokio::test]
async fn get_resolves_by_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.md"), MODULE_A).expect("write a");

    let registry = ModuleRegistry::load(dir.path()).await.expect("load registry");
    let found = registry.get(&HuntModuleId::new("module-a")).await;
    assert!(found.is_some());
    assert!(registry.get(&HuntModuleId::new("missing")).await.is_none());
}

#[tokio::test]
async fn poll_reloads_after_a_new_file_is_added() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.md"), MODULE_A).expect("write a");

    let registry = ModuleRegistry::load(dir.path()).await.expect("load registry");
    assert_eq!(registry.list().await.len(), 1);

    // Force a distinct mtime on the directory entry.
    std::thread::sleep(std::time::Duration::from_millis(10));
    std::fs::write(dir.path().join("b.md"), MODULE_B).expect("write b");

    let changed = registry.poll().await.expect("poll");
    assert!(changed);
    assert_eq!(registry.list().await.len(), 2);
}

#[tokio::test]
async fn poll_is_a_no_op_when_nothing_changed() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("a.md"), MODULE_A).expect("write a");

    let registry = ModuleRegistry::load(dir.path()).await.expect("load registry");
    let changed = registry.poll().await.expect("poll");
    assert!(!changed);
}
