//! Shared test utilities for integration tests.
//!
//! Provides helpers for creating temporary git repositories and committing
//! files into them.

#![allow(dead_code)]

use anyhow::Result;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Creates temporary git repository with test configuration.
///
/// Sets up a clean git repository with user name and email configured.
///
/// # Errors
///
/// Returns error if git commands fail or directory creation fails
pub fn create_test_repo() -> Result<TempDir> {
    let dir = TempDir::new()?;
    let path = dir.path();

    run_git(path, &["init", "--quiet"])?;
    run_git(path, &["config", "user.name", "Test User"])?;
    run_git(path, &["config", "user.email", "test@example.com"])?;
    run_git(path, &["config", "commit.gpgsign", "false"])?;

    Ok(dir)
}

/// Runs git in repository and fails on non-zero exit.
///
/// # Returns
///
/// Trimmed standard output
pub fn run_git(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()?;

    if !output.status.success() {
        anyhow::bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

/// Stages every change, commits, and returns the commit hash.
///
/// # Errors
///
/// Returns error if staging or committing fails
pub fn commit_all(repo_path: &Path, message: &str) -> Result<String> {
    run_git(repo_path, &["add", "-A"])?;
    run_git(repo_path, &["commit", "--quiet", "-m", message])?;
    run_git(repo_path, &["rev-parse", "HEAD"])
}

/// Writes file to repository, creating parent directories as needed.
///
/// # Errors
///
/// Returns error if directory creation or file write fails
pub fn write_file(repo_path: &Path, path: &str, content: impl AsRef<[u8]>) -> Result<()> {
    let file_path = repo_path.join(path);
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content)?;
    Ok(())
}

/// Removes file from the working tree.
pub fn remove_file(repo_path: &Path, path: &str) -> Result<()> {
    std::fs::remove_file(repo_path.join(path))?;
    Ok(())
}
