//! CLI commands
//!
//! Command implementations for the `mrs` binary.

mod auth;
mod progress;
mod reorder;
mod stack;
pub mod style;
mod sync;

pub use auth::{run_auth_setup, run_auth_test};
pub use reorder::run_reorder;
pub use stack::{run_create, run_delete, run_list, run_show, run_switch, run_track};
pub use sync::run_sync;

use mr_stack::error::{Error, Result};
use mr_stack::git::{GitRunner, SystemGit, parse_default_branch};
use mr_stack::platform::{MergeRequestService, create_platform_service, parse_repo_info};
use mr_stack::stack::{FileStackStore, Stack, StackStore};
use std::path::Path;
use tracing::debug;

/// A git working copy together with its stack storage
pub struct Workspace {
    /// Git runner rooted at the working copy
    pub git: SystemGit,
    /// Stack files under the git directory
    pub store: FileStackStore,
}

impl Workspace {
    /// Open the repository containing `path`
    pub fn open(path: &Path) -> Result<Self> {
        let git = SystemGit::new(path);
        let git_dir = git.git_dir()?;
        debug!("Using git directory {}", git_dir.display());
        let store = FileStackStore::new(&git_dir);
        Ok(Self { git, store })
    }

    /// Title of the requested stack, or the current one
    pub fn stack_title(&self, requested: Option<&str>) -> Result<String> {
        if let Some(title) = requested {
            return Ok(title.to_string());
        }
        self.store.current()?.ok_or_else(|| {
            Error::StackNotFound("no current stack; run `mrs create <title>` first".to_string())
        })
    }

    /// Load the requested stack, or the current one
    pub fn load_stack(&self, requested: Option<&str>) -> Result<Stack> {
        let title = self.stack_title(requested)?;
        self.store.load(&title)
    }

    /// Connect to the GitLab project behind `remote`
    pub async fn platform(&self, remote: &str) -> Result<Box<dyn MergeRequestService>> {
        let remote = self.git.remote(remote)?;
        let config = parse_repo_info(&remote.url)?;
        debug!("GitLab project {}", config.project_path());
        create_platform_service(&config).await
    }

    /// Branch the stack's head targets
    pub fn base_branch(&self, stack: &Stack, remote: &str) -> Result<String> {
        if let Some(base) = &stack.base_branch {
            return Ok(base.clone());
        }
        let output = self.git.git(&["remote", "show", remote])?;
        parse_default_branch(&output).ok_or_else(|| Error::DefaultBranchNotFound(remote.to_string()))
    }
}
