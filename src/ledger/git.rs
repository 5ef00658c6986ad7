//! Git-backed ledger implementation.
//!
//! Shells out to the `git` CLI with the content root as the working
//! directory. Publishing is auto-detected: the snapshot is pushed only
//! when the repository has a remote configured.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::fs;
use tokio::process::Command;
use tracing::{debug, warn};

use super::Ledger;

/// Ledger that snapshots the content root into a git repository
pub struct GitLedger {
    /// Content root, also the git working directory
    root: PathBuf,

    /// Path to the git binary (default: "git")
    binary_path: String,

    /// Committer name used when initializing the repository
    user_name: String,

    /// Committer email used when initializing the repository
    user_email: String,
}

impl GitLedger {
    /// Create a ledger over the given content root
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            binary_path: "git".to_string(),
            user_name: "CourseMap".to_string(),
            user_email: "coursemap@local".to_string(),
        }
    }

    /// Use a custom git binary path
    pub fn with_binary_path(mut self, binary_path: impl Into<String>) -> Self {
        self.binary_path = binary_path.into();
        self
    }

    /// Use a custom committer identity
    pub fn with_identity(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.user_name = name.into();
        self.user_email = email.into();
        self
    }

    /// The content root this ledger snapshots
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Initialize the working directory: create the root and run
    /// `git init` plus committer identity config when no repository
    /// exists yet. Idempotent.
    pub async fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create content root: {}", self.root.display()))?;

        if self.root.join(".git").exists() {
            return Ok(());
        }

        self.run_checked(&["init"]).await?;
        self.run_checked(&["config", "user.name", &self.user_name])
            .await?;
        self.run_checked(&["config", "user.email", &self.user_email])
            .await?;

        Ok(())
    }

    /// Run a git subcommand in the content root
    async fn run_checked(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.binary_path)
            .args(args)
            .current_dir(&self.root)
            .output()
            .await
            .with_context(|| format!("Failed to run git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!(
                "git {} failed with exit code {}: {}",
                args.join(" "),
                exit_code,
                stderr.trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Stage, commit, and publish when a remote is configured
    async fn try_commit(&self, message: &str) -> Result<()> {
        self.run_checked(&["add", "-A"]).await?;
        self.run_checked(&["commit", "-m", message]).await?;

        let remotes = self.run_checked(&["remote"]).await?;
        if !remotes.trim().is_empty() {
            self.run_checked(&["push"]).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl Ledger for GitLedger {
    fn name(&self) -> &str {
        "git"
    }

    async fn commit(&self, message: &str) -> bool {
        match self.try_commit(message).await {
            Ok(()) => {
                debug!(message, "Recorded ledger revision");
                true
            }
            Err(e) => {
                // Includes the nothing-to-commit case; auditing is
                // best-effort and the data mutation already landed.
                warn!(error = %e, message, "Ledger commit failed");
                false
            }
        }
    }
}
