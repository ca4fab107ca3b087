//! Integration tests for the gitxp CLI
//!
//! Wrapper behavior needs a real git binary; tests that exercise it bail
//! out early when git is not installed.

use assert_cmd::cargo;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// Get a Command for the gitxp binary, isolated from the host identity.
fn gitxp(home: &Path) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("gitxp"));
    cmd.env("HOME", home)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("GIT_CONFIG_GLOBAL");
    cmd
}

fn git_available() -> bool {
    std::process::Command::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

/// Run a git setup command inside a repo with the given isolated home.
fn git(home: &Path, repo: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .args(args)
        .current_dir(repo)
        .env("HOME", home)
        .env("GIT_CONFIG_NOSYSTEM", "1")
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("GIT_CONFIG_GLOBAL")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .expect("run git");
    assert!(status.success(), "git {args:?} failed");
}

fn write_identity(home: &Path) {
    std::fs::write(
        home.join(".gitconfig"),
        "[user]\n\temail = dev@example.com\n\tname = Dev\n",
    )
    .expect("write .gitconfig");
}

#[test]
fn test_help_lists_internal_commands() {
    let home = TempDir::new().expect("temp home");
    gitxp(home.path())
        .arg("help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Internal Commands"))
        .stdout(predicate::str::contains("profile"));
}

#[test]
fn test_profile_without_identity_reports_error() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().expect("temp home");
    let cwd = TempDir::new().expect("temp cwd");

    gitxp(home.path())
        .arg("profile")
        .current_dir(cwd.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot find Git user email"));
}

#[test]
fn test_profile_shows_fresh_level_one() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().expect("temp home");
    let cwd = TempDir::new().expect("temp cwd");
    write_identity(home.path());

    gitxp(home.path())
        .arg("profile")
        .current_dir(cwd.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("dev@example.com"))
        .stdout(predicate::str::contains("Level: 1"));

    // The fresh profile was materialized on first lookup.
    assert!(home.path().join(".gitxp").exists());
}

#[test]
fn test_profile_details_lists_catalog() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().expect("temp home");
    let cwd = TempDir::new().expect("temp cwd");
    write_identity(home.path());

    gitxp(home.path())
        .arg("profile")
        .arg("--details")
        .current_dir(cwd.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("( ) First Steps"))
        .stdout(predicate::str::contains("XP Reward"));
}

#[test]
fn test_profile_stats_lists_counters() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().expect("temp home");
    let cwd = TempDir::new().expect("temp cwd");
    write_identity(home.path());

    gitxp(home.path())
        .arg("profile")
        .arg("--stats")
        .current_dir(cwd.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total commits: 0"))
        .stdout(predicate::str::contains("Consecutive commit days: 0"));
}

#[test]
fn test_unknown_arguments_are_forwarded_to_git() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().expect("temp home");
    let cwd = TempDir::new().expect("temp cwd");

    gitxp(home.path())
        .arg("--version")
        .current_dir(cwd.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("git version"));
}

#[test]
fn test_wrapper_propagates_git_failure() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().expect("temp home");
    let cwd = TempDir::new().expect("temp cwd");

    // Not a repository: the underlying git command fails and so do we,
    // with no progression output.
    gitxp(home.path())
        .arg("rev-parse")
        .arg("HEAD")
        .current_dir(cwd.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("You gained").not());
}

#[test]
fn test_commit_through_wrapper_awards_xp() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().expect("temp home");
    let repo = TempDir::new().expect("temp repo");
    write_identity(home.path());

    git(home.path(), repo.path(), &["init", "-q"]);
    std::fs::write(repo.path().join("a.txt"), "hello\n").expect("write file");
    git(home.path(), repo.path(), &["add", "."]);

    gitxp(home.path())
        .arg("commit")
        .arg("-m")
        .arg("initial")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("You gained"))
        .stdout(predicate::str::contains("Achievement Unlocked!"))
        .stdout(predicate::str::contains("First Steps"));

    // A second commit the same day keeps the streak at 1 and unlocks
    // nothing new.
    std::fs::write(repo.path().join("a.txt"), "hello again\n").expect("write file");
    git(home.path(), repo.path(), &["add", "."]);

    gitxp(home.path())
        .arg("commit")
        .arg("-m")
        .arg("second")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("You gained"))
        .stdout(predicate::str::contains("First Steps").not());
}

#[test]
fn test_push_is_not_gamified_on_failure() {
    if !git_available() {
        return;
    }
    let home = TempDir::new().expect("temp home");
    let repo = TempDir::new().expect("temp repo");
    write_identity(home.path());

    git(home.path(), repo.path(), &["init", "-q"]);

    // No remote configured: push fails, so no XP and no profile write.
    gitxp(home.path())
        .arg("push")
        .current_dir(repo.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("You gained").not());

    assert!(!home.path().join(".gitxp").exists());
}
