//! GitLab authentication
//!
//! Supports the `glab` CLI and environment variables.

mod gitlab;

pub use gitlab::{GitLabAuthConfig, get_gitlab_auth, test_gitlab_auth};

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from the `glab` CLI
    Cli,
    /// Token from environment variable
    EnvVar,
}
