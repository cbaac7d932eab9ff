//! Core types for mr-stack

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a merge request as reported by GitLab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    /// Open for review
    Opened,
    /// Closed without merging
    Closed,
    /// Merged into its target
    Merged,
    /// Locked (transitional state during merge)
    Locked,
}

impl MergeRequestState {
    /// Value used by the GitLab `state` query parameter
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Closed => "closed",
            Self::Merged => "merged",
            Self::Locked => "locked",
        }
    }
}

impl fmt::Display for MergeRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// A merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Project-scoped MR number
    pub iid: u64,
    /// Numeric ID of the project that owns the MR
    pub project_id: u64,
    /// Web URL for the MR
    pub web_url: String,
    /// Source branch name
    pub source_branch: String,
    /// Target branch name
    pub target_branch: String,
    /// MR title
    pub title: String,
    /// MR description
    #[serde(default)]
    pub description: Option<String>,
    /// Current state
    pub state: MergeRequestState,
}

/// Parameters for creating a merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMergeRequest {
    /// Branch with the changes
    pub source_branch: String,
    /// Branch to merge into
    pub target_branch: String,
    /// MR title
    pub title: String,
    /// MR description (may be empty)
    pub description: String,
    /// User to assign the MR to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    /// Delete the source branch once merged
    pub remove_source_branch: bool,
}

/// A GitLab user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric user ID
    pub id: u64,
    /// Login name
    pub username: String,
}

/// A git remote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRemote {
    /// Remote name (e.g., "origin")
    pub name: String,
    /// Remote URL
    pub url: String,
}

/// GitLab project configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Namespace (user or group path, may be nested)
    pub owner: String,
    /// Project name
    pub repo: String,
    /// Custom host (None for gitlab.com)
    pub host: Option<String>,
}

impl PlatformConfig {
    /// Full project path, e.g. `group/subgroup/repo`
    pub fn project_path(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// Split a stack ref description into an MR title and body
///
/// The first line becomes the title and the remainder, trimmed, the body.
/// A description without a newline yields an empty body.
pub fn split_description(description: &str) -> (String, String) {
    let description = description.trim();
    match description.split_once('\n') {
        Some((title, body)) => (title.trim().to_string(), body.trim().to_string()),
        None => (description.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_single_line() {
        assert_eq!(
            split_description("single line desc"),
            ("single line desc".to_string(), String::new())
        );
    }

    #[test]
    fn test_split_multi_line() {
        assert_eq!(
            split_description("multi line desc\n\ndescription, bark!"),
            ("multi line desc".to_string(), "description, bark!".to_string())
        );
    }

    #[test]
    fn test_state_deserializes_lowercase() {
        let state: MergeRequestState = serde_json::from_str("\"merged\"").unwrap();
        assert_eq!(state, MergeRequestState::Merged);
        assert_eq!(state.to_string(), "merged");
    }

    #[test]
    fn test_project_path_nested() {
        let config = PlatformConfig {
            owner: "group/subgroup".to_string(),
            repo: "repo".to_string(),
            host: None,
        };
        assert_eq!(config.project_path(), "group/subgroup/repo");
    }
}
