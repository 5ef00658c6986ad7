//! Git Ledger Integration Tests
//!
//! These run the real git binary against a temp directory.

use std::process::Command;

use coursemap::core::ContentRepository;
use coursemap::ledger::{GitLedger, Ledger};
use tempfile::TempDir;

fn git_log_count(root: &std::path::Path) -> usize {
    let output = Command::new("git")
        .args(["log", "--oneline"])
        .current_dir(root)
        .output()
        .unwrap();
    String::from_utf8_lossy(&output.stdout).lines().count()
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");

    let ledger = GitLedger::new(&root).with_identity("Tester", "tester@example.com");
    ledger.init().await.unwrap();
    assert!(root.join(".git").exists());

    ledger.init().await.unwrap();
}

#[tokio::test]
async fn test_commit_records_revision_and_empty_commit_fails_quietly() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");

    let ledger = GitLedger::new(&root).with_identity("Tester", "tester@example.com");
    ledger.init().await.unwrap();

    tokio::fs::write(root.join("note.md"), "hello").await.unwrap();
    assert!(ledger.commit("Add note").await);
    assert_eq!(git_log_count(&root), 1);

    // Nothing staged: the snapshot fails, is swallowed, and the
    // working directory is untouched.
    assert!(!ledger.commit("Nothing to record").await);
    assert_eq!(git_log_count(&root), 1);
}

#[tokio::test]
async fn test_repository_mutations_each_get_a_revision() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");

    let repo = ContentRepository::open(&root).await.unwrap();

    let course = repo.create_course("CS101", "Algorithms").await.unwrap();
    let module = repo.create_module(course.id, "Sorting").await.unwrap();
    repo.create_topic(course.id, module.id, coursemap::core::NewTopic::new("Quicksort"))
        .await
        .unwrap();

    // One revision per mutation.
    assert_eq!(git_log_count(&root), 3);

    let output = Command::new("git")
        .args(["log", "--format=%s"])
        .current_dir(&root)
        .output()
        .unwrap();
    let subjects = String::from_utf8_lossy(&output.stdout);
    let subjects: Vec<&str> = subjects.lines().collect();

    // Newest first.
    assert_eq!(subjects[0], "Add topic: Quicksort");
    assert_eq!(subjects[1], "Add module: Sorting");
    assert_eq!(subjects[2], "Create course: CS101 - Algorithms");
}
