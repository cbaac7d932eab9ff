//! Merge request platform services
//!
//! Provides the narrow set of merge request operations the stack engines need.

mod detection;
mod factory;
mod gitlab;

pub use detection::{is_gitlab_host, parse_repo_info};
pub use factory::create_platform_service;
pub use gitlab::GitLabService;

use crate::error::Result;
use crate::types::{MergeRequest, MergeRequestState, NewMergeRequest, PlatformConfig, User};
use async_trait::async_trait;

/// Merge request operations on one project
///
/// Engines only talk to GitLab through this trait, so tests can substitute
/// a recording mock.
#[async_trait]
pub trait MergeRequestService: Send + Sync {
    /// List MRs whose source branch is `branch`, newest first, optionally
    /// filtered by state
    async fn list_merge_requests(
        &self,
        branch: &str,
        state: Option<MergeRequestState>,
    ) -> Result<Vec<MergeRequest>>;

    /// Fetch the full record of one MR
    async fn get_merge_request(&self, iid: u64) -> Result<MergeRequest>;

    /// Change the target branch of an MR
    async fn update_merge_request_target(&self, iid: u64, target_branch: &str)
    -> Result<MergeRequest>;

    /// Create a new MR
    async fn create_merge_request(&self, request: &NewMergeRequest) -> Result<MergeRequest>;

    /// The authenticated user
    async fn current_user(&self) -> Result<User>;

    /// Get the project configuration
    fn config(&self) -> &PlatformConfig;

    /// List open MRs whose source branch is `branch`
    async fn list_open_merge_requests(&self, branch: &str) -> Result<Vec<MergeRequest>> {
        self.list_merge_requests(branch, Some(MergeRequestState::Opened))
            .await
    }
}
