//! Process-backed git runner

use crate::error::{Error, Result};
use crate::git::GitRunner;
use crate::types::GitRemote;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Runs the `git` binary inside a working directory
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: PathBuf,
}

impl SystemGit {
    /// Create a runner rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Working directory git runs in
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Absolute path of the repository's git directory
    pub fn git_dir(&self) -> Result<PathBuf> {
        let out = self.git(&["rev-parse", "--absolute-git-dir"])?;
        Ok(PathBuf::from(out.trim()))
    }

    /// Commit SHA a branch points at
    pub fn rev_parse(&self, rev: &str) -> Result<String> {
        Ok(self.git(&["rev-parse", rev])?.trim().to_string())
    }

    /// Full commit message of a branch tip
    pub fn commit_message(&self, rev: &str) -> Result<String> {
        Ok(self
            .git(&["log", "-1", "--format=%B", rev])?
            .trim()
            .to_string())
    }

    /// Name of the checked-out branch
    pub fn current_branch(&self) -> Result<String> {
        Ok(self
            .git(&["rev-parse", "--abbrev-ref", "HEAD"])?
            .trim()
            .to_string())
    }

    /// Look up a remote by name
    pub fn remote(&self, name: &str) -> Result<GitRemote> {
        let url = self.git(&["remote", "get-url", name])?;
        Ok(GitRemote {
            name: name.to_string(),
            url: url.trim().to_string(),
        })
    }
}

impl GitRunner for SystemGit {
    fn git(&self, args: &[&str]) -> Result<String> {
        let command = args.join(" ");
        debug!("git {command}");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if output.status.success() {
            return Ok(stdout);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = [stdout.trim(), stderr.trim()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n");

        Err(Error::Git {
            command,
            message,
            code: output.status.code(),
        })
    }
}
