//! Invocation of the wrapped git binary.
//!
//! The wrapper forwards arguments untouched and relays both output streams
//! live; the read-only queries used by the progression pass capture their
//! output instead.

pub mod diff;

use std::path::PathBuf;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::debug;

use crate::config::AppSettings;
use crate::error::{GitxpError, Result};
use diff::DiffStats;

/// Runs the configured git executable.
#[derive(Debug, Clone)]
pub struct GitRunner {
    program: PathBuf,
    dir: Option<PathBuf>,
}

impl GitRunner {
    /// Resolve the configured git executable on the search path.
    pub fn new(settings: &AppSettings) -> Result<Self> {
        let program = which::which(&settings.git.executable_path).map_err(|_| {
            GitxpError::MissingTool {
                tool: settings.git.executable_path.clone(),
            }
        })?;
        debug!("Using git executable at {}", program.display());
        Ok(Self { program, dir: None })
    }

    /// Run all git invocations from the given directory instead of the
    /// process working directory.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = Some(dir.into());
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        if let Some(dir) = &self.dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Forward the argument list to git, relaying stdout and stderr live.
    ///
    /// Both streams are drained concurrently so a full pipe buffer can
    /// never stall the child, and both are fully consumed before the exit
    /// status is taken. Returns the child's exit code.
    pub async fn run_passthrough(&self, args: &[String]) -> Result<i32> {
        let mut child = self
            .command()
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| GitxpError::git("spawn", e.to_string()))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let out_task = tokio::spawn(async move {
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    println!("{line}");
                }
            }
        });
        let err_task = tokio::spawn(async move {
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    eprintln!("{line}");
                }
            }
        });

        let _ = tokio::join!(out_task, err_task);

        let status = child
            .wait()
            .await
            .map_err(|e| GitxpError::git("wait", e.to_string()))?;
        Ok(status.code().unwrap_or(1))
    }

    /// Run a read-only query, returning captured stdout on exit 0.
    async fn capture(&self, args: &[&str]) -> Option<String> {
        let output = self.command().args(args).output().await.ok()?;
        if !output.status.success() {
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Change statistics for the commit just created, diffed against its
    /// parent.
    ///
    /// The two queries run concurrently; if either fails (most commonly a
    /// root commit with no `HEAD~1`) the whole result is absent, so a
    /// partial read never reaches the engine.
    pub async fn commit_diff_stats(&self) -> Option<DiffStats> {
        let (summary, name_status) = tokio::join!(
            self.capture(&["diff", "--stat", "HEAD~1"]),
            self.capture(&["diff", "--name-status", "HEAD~1"]),
        );
        match (summary, name_status) {
            (Some(summary), Some(name_status)) => Some(DiffStats::parse(&summary, &name_status)),
            _ => None,
        }
    }

    /// Message of the most recent commit.
    pub async fn last_commit_message(&self) -> Option<String> {
        self.capture(&["log", "-1", "--pretty=%B"])
            .await
            .map(|text| text.trim().to_string())
    }

    /// The configured identity email, if any.
    pub async fn user_email(&self) -> Option<String> {
        let output = self.capture(&["config", "user.email"]).await?;
        let email = output.trim().to_string();
        if email.is_empty() {
            None
        } else {
            Some(email)
        }
    }
}
