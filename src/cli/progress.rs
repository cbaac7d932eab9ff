//! Terminal progress output for sync and reorder

use crate::cli::style::{Stylize, arrow, check, cross};
use anstream::{eprintln, print, println};
use async_trait::async_trait;
use mr_stack::error::Error;
use mr_stack::git::SyncState;
use mr_stack::sync::{Phase, ProgressCallback, PushStatus};
use mr_stack::types::MergeRequest;
use std::io::Write;

/// Progress callback that prints styled lines to the terminal
pub struct CliProgress;

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Complete => {}
            _ => println!("{}...", phase.to_string().emphasis()),
        }
    }

    async fn on_branch_state(&self, branch: &str, state: SyncState) {
        match state {
            SyncState::NothingToCommit => {
                println!("  {} {}", branch.accent(), state.to_string().muted());
            }
            _ => println!("  {} {}", branch.accent(), state.to_string().warn()),
        }
    }

    async fn on_branch_push(&self, branch: &str, status: PushStatus) {
        match &status {
            PushStatus::Started => {
                print!("    Pushing {}... ", branch.accent());
                let _ = std::io::stdout().flush();
            }
            PushStatus::Success => println!("{}", "done".success()),
            PushStatus::Failed(_) => println!("{}", status.to_string().error()),
        }
    }

    async fn on_mr_created(&self, branch: &str, mr: &MergeRequest) {
        println!(
            "  {} Created !{} for {} {} {}",
            check(),
            mr.iid.accent(),
            branch.emphasis(),
            arrow(),
            mr.target_branch.accent()
        );
        println!("    {}", mr.web_url.muted());
    }

    async fn on_mr_updated(&self, branch: &str, mr: &MergeRequest) {
        println!(
            "  {} Retargeted !{} ({}) {} {}",
            check(),
            mr.iid.accent(),
            branch.emphasis(),
            arrow(),
            mr.target_branch.accent()
        );
    }

    async fn on_branch_removed(&self, branch: &str) {
        println!(
            "  {} {} was merged and left the stack",
            check(),
            branch.accent()
        );
    }

    async fn on_error(&self, err: &Error) {
        eprintln!("{} {}: {}", cross(), "error".error(), err);
    }

    async fn on_message(&self, message: &str) {
        println!("  {}", message.muted());
    }
}
