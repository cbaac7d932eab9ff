//! Merge request retargeting after a reorder
//!
//! Compares the target branch every node had before and after a reorder and
//! moves the MRs whose target changed. Local git state is never touched.

use crate::error::Result;
use crate::platform::MergeRequestService;
use crate::stack::Stack;
use crate::sync::{Phase, ProgressCallback};
use crate::types::MergeRequest;
use tracing::{debug, info};

/// An MR whose target branch changes between two orderings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetChange {
    /// SHA of the stack ref
    pub sha: String,
    /// Source branch of the MR
    pub branch: String,
    /// Target before the reorder
    pub old_target: String,
    /// Target after the reorder
    pub new_target: String,
}

/// Work out which MRs need a new target branch
///
/// Each stack falls back to `default_branch` for its head when it has no
/// base branch of its own. Refs without an MR are skipped.
pub fn plan_target_changes(
    old: &Stack,
    new: &Stack,
    default_branch: &str,
) -> Result<Vec<TargetChange>> {
    let old_base = old.base_branch.as_deref().unwrap_or(default_branch);
    let new_base = new.base_branch.as_deref().unwrap_or(default_branch);

    let mut changes = Vec::new();
    for node in new.iter() {
        let node = node?;
        let new_target = new.target_branch(&node.sha, new_base)?;
        let old_target = old.target_branch(&node.sha, old_base)?;

        if new_target == old_target || node.mr.is_none() {
            continue;
        }

        changes.push(TargetChange {
            sha: node.sha.clone(),
            branch: node.branch.clone(),
            old_target,
            new_target,
        });
    }

    Ok(changes)
}

/// Push changed MR targets to the platform
///
/// Each MR is looked up by source branch among open MRs; branches without
/// an open MR are skipped. The first API failure aborts, leaving earlier
/// updates in place. Returns the updated MRs.
pub async fn update_mr_targets(
    old: &Stack,
    new: &Stack,
    default_branch: &str,
    platform: &dyn MergeRequestService,
    progress: &dyn ProgressCallback,
) -> Result<Vec<MergeRequest>> {
    let changes = plan_target_changes(old, new, default_branch)?;
    progress.on_phase(Phase::UpdatingTargets).await;

    let mut updated = Vec::new();
    for change in &changes {
        match retarget(change, platform).await {
            Ok(Some(mr)) => {
                progress.on_mr_updated(&change.branch, &mr).await;
                updated.push(mr);
            }
            Ok(None) => {}
            Err(e) => {
                let e = e.on_branch(&change.branch);
                progress.on_error(&e).await;
                return Err(e);
            }
        }
    }

    Ok(updated)
}

async fn retarget(
    change: &TargetChange,
    platform: &dyn MergeRequestService,
) -> Result<Option<MergeRequest>> {
    let open = platform.list_open_merge_requests(&change.branch).await?;
    let Some(found) = open.first() else {
        debug!("No open MR for {}, nothing to retarget", change.branch);
        return Ok(None);
    };

    let mr = platform.get_merge_request(found.iid).await?;
    let mr = platform
        .update_merge_request_target(mr.iid, &change.new_target)
        .await?;

    info!(
        "Retargeted !{} ({}): {} -> {}",
        mr.iid, change.branch, change.old_target, change.new_target
    );
    Ok(Some(mr))
}
