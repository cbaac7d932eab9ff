//! Progress callback trait for interface-agnostic updates
//!
//! Engines report what they do through this trait instead of printing, so
//! the CLI can render progress while tests stay silent.

use crate::error::Error;
use crate::git::SyncState;
use crate::types::MergeRequest;
use async_trait::async_trait;
use std::fmt;

/// Engine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Fetching from the remote
    Fetching,
    /// Reconciling each branch with its upstream
    SyncingBranches,
    /// Creating missing MRs
    CreatingMrs,
    /// Force-pushing rewritten branches
    Pushing,
    /// Retargeting MRs after a reorder
    UpdatingTargets,
    /// Operation complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fetching => "Fetching",
            Self::SyncingBranches => "Syncing branches",
            Self::CreatingMrs => "Creating merge requests",
            Self::Pushing => "Pushing",
            Self::UpdatingTargets => "Updating merge request targets",
            Self::Complete => "Done",
        })
    }
}

/// Push operation status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushStatus {
    /// Push started
    Started,
    /// Push succeeded
    Success,
    /// Push failed with error message
    Failed(String),
}

impl fmt::Display for PushStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => f.write_str("pushing"),
            Self::Success => f.write_str("pushed"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Progress callback trait
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called once a branch has been classified
    async fn on_branch_state(&self, branch: &str, state: SyncState);

    /// Called when a branch is being pushed
    async fn on_branch_push(&self, branch: &str, status: PushStatus);

    /// Called when an MR is created
    async fn on_mr_created(&self, branch: &str, mr: &MergeRequest);

    /// Called when an MR's target branch changes
    async fn on_mr_updated(&self, branch: &str, mr: &MergeRequest);

    /// Called when a merged branch leaves the stack
    async fn on_branch_removed(&self, branch: &str);

    /// Called when an error occurs
    async fn on_error(&self, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_branch_state(&self, _branch: &str, _state: SyncState) {}
    async fn on_branch_push(&self, _branch: &str, _status: PushStatus) {}
    async fn on_mr_created(&self, _branch: &str, _mr: &MergeRequest) {}
    async fn on_mr_updated(&self, _branch: &str, _mr: &MergeRequest) {}
    async fn on_branch_removed(&self, _branch: &str) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
