//! Error types for mr-stack

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by stack, git and GitLab operations
#[derive(Debug, Error)]
pub enum Error {
    /// Reordered branch list is not a permutation of the stack's branches
    #[error(
        "branch list does not match the stack (missing: [{}], unknown: [{}], duplicated: [{}])",
        .missing.join(", "),
        .unknown.join(", "),
        .duplicated.join(", ")
    )]
    MissingBranches {
        /// Stack branches absent from the list
        missing: Vec<String>,
        /// Listed branches that are not in the stack
        unknown: Vec<String>,
        /// Branches listed more than once
        duplicated: Vec<String>,
    },

    /// Stack links violate the stack invariants
    #[error("invalid stack: {0}")]
    InvalidStack(String),

    /// Operation needs at least one ref
    #[error("stack is empty")]
    EmptyStack,

    /// No ref with this SHA in the stack
    #[error("no stack ref for commit {0}")]
    RefNotFound(String),

    /// Branch is already part of the stack
    #[error("branch '{0}' is already in the stack")]
    DuplicateBranch(String),

    /// No stored stack with this title
    #[error("stack not found: {0}")]
    StackNotFound(String),

    /// A git command exited unsuccessfully
    #[error("git {command} failed: {message}")]
    Git {
        /// Arguments passed to git, space separated
        command: String,
        /// Output of the failed command, verbatim
        message: String,
        /// Exit status, `None` when killed by a signal
        code: Option<i32>,
    },

    /// The working tree has tracked changes that were not committed
    #[error("branch '{0}' has uncommitted changes; commit or stash them first")]
    UncommittedChanges(String),

    /// `git remote show` output carried no HEAD branch
    #[error("could not determine the default branch of remote '{0}'")]
    DefaultBranchNotFound(String),

    /// The resolved base branch does not exist on the remote
    #[error("base branch '{branch}' does not exist on remote '{remote}'")]
    BaseBranchNotOnRemote {
        /// Base branch name
        branch: String,
        /// Remote name
        remote: String,
    },

    /// GitLab API returned an error
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// Generic platform failure (used by alternative service implementations)
    #[error("platform error: {0}")]
    Platform(String),

    /// Authentication could not be established
    #[error("authentication failed: {0}")]
    Auth(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stack metadata could not be (de)serialized
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input could not be parsed
    #[error("parse error: {0}")]
    Parse(String),

    /// No remote points at a GitLab instance
    #[error("no supported GitLab remote found")]
    NoSupportedRemotes,

    /// Unexpected internal state
    #[error("internal error: {0}")]
    Internal(String),

    /// An error raised while processing one branch of the stack
    #[error("{branch}: {source}")]
    Branch {
        /// Branch being processed when the error happened
        branch: String,
        /// Underlying error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Attach the branch being processed to this error
    #[must_use]
    pub fn on_branch(self, branch: &str) -> Self {
        match self {
            Self::Branch { .. } => self,
            other => Self::Branch {
                branch: branch.to_string(),
                source: Box::new(other),
            },
        }
    }

    /// The branch this error is attributed to, if any
    pub fn branch(&self) -> Option<&str> {
        match self {
            Self::Branch { branch, .. } => Some(branch),
            _ => None,
        }
    }
}
