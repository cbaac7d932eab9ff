//! Interpretation of git command output

use crate::error::{Error, Result};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

const BRANCH_IS_BEHIND: &str = "Your branch is behind";
const BRANCH_HAS_DIVERGED: &str = "have diverged";
const BRANCH_IS_AHEAD: &str = "Your branch is ahead";
const UNCOMMITTED_MARKERS: [&str; 2] = ["Changes to be committed", "Changes not staged for commit"];

static HEAD_BRANCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*HEAD branch:\s*(\S+)\s*$").expect("valid regex"));

/// How a local branch relates to its upstream, from one `git status -uno` probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Local branch matches its remote tracking state (or has no upstream)
    NothingToCommit,
    /// Upstream has commits the local branch lacks; fast-forward with a pull
    BranchIsBehind,
    /// Local and upstream histories have diverged; rebase needed
    BranchHasDiverged,
    /// Local branch has commits the upstream lacks; left as is
    BranchIsAhead,
}

impl SyncState {
    /// Classify the output of `git status -uno` for `branch`
    ///
    /// Tracked changes that are not committed abort the sync rather than
    /// being carried through a checkout or rebase.
    pub fn from_status(branch: &str, output: &str) -> Result<Self> {
        if UNCOMMITTED_MARKERS.iter().any(|m| output.contains(m)) {
            return Err(Error::UncommittedChanges(branch.to_string()));
        }

        Ok(if output.contains(BRANCH_IS_BEHIND) {
            Self::BranchIsBehind
        } else if output.contains(BRANCH_HAS_DIVERGED) {
            Self::BranchHasDiverged
        } else if output.contains(BRANCH_IS_AHEAD) {
            Self::BranchIsAhead
        } else {
            Self::NothingToCommit
        })
    }

    /// Whether handling this state rewrites the local branch, so the stack
    /// must be force-pushed afterwards
    pub const fn needs_push(self) -> bool {
        matches!(self, Self::BranchIsBehind | Self::BranchHasDiverged)
    }
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::NothingToCommit => "up to date",
            Self::BranchIsBehind => "behind",
            Self::BranchHasDiverged => "diverged",
            Self::BranchIsAhead => "ahead",
        })
    }
}

/// Extract the default branch from `git remote show <remote>` output
pub fn parse_default_branch(output: &str) -> Option<String> {
    HEAD_BRANCH
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|b| b != "(unknown)")
}
