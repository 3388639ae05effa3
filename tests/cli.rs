//! Exit codes and stream discipline of the two binaries.
//!
//! Neither binary has a terminal here, so only paths that finish before
//! the first password prompt (or fail at it) are exercised.

use std::path::PathBuf;
use std::process::Command;

fn encrypt_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_encrypt-ideas"))
}

fn unlock_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_unlock-ideas"))
}

#[test]
fn test_malformed_idea_file_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let ideas = dir.path().join("post_ideas.json");
    std::fs::write(&ideas, "[{\"title\":").unwrap();

    let output = Command::new(encrypt_bin())
        .arg("--ideas")
        .arg(&ideas)
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("could not parse"));
}

#[test]
fn test_unlock_without_container_exits_nonzero() {
    let output = Command::new(unlock_bin())
        .env_remove("ENCRYPTED_IDEAS")
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no encrypted data available"));
}
