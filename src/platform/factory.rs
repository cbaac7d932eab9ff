//! Platform service factory
//!
//! Creates the GitLab service for a detected project.

use crate::auth::get_gitlab_auth;
use crate::error::Result;
use crate::platform::{GitLabService, MergeRequestService};
use crate::types::PlatformConfig;

/// Create a merge request service from configuration
///
/// Handles authentication and client construction.
pub async fn create_platform_service(
    config: &PlatformConfig,
) -> Result<Box<dyn MergeRequestService>> {
    let auth = get_gitlab_auth(config.host.as_deref()).await?;
    Ok(Box::new(GitLabService::new(
        auth.token,
        config.owner.clone(),
        config.repo.clone(),
        Some(auth.host),
    )))
}
