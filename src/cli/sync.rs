//! Sync command - bring a stack in line with its remote branches and MRs

use crate::cli::Workspace;
use crate::cli::progress::CliProgress;
use crate::cli::style::{Stylize, check};
use anstream::println;
use mr_stack::error::Result;
use mr_stack::sync::{SyncEnv, SyncOptions, sync_stack};
use std::path::Path;

/// Run the sync command
pub async fn run_sync(
    path: &Path,
    stack: Option<&str>,
    base_branch: Option<&str>,
    remote: &str,
) -> Result<()> {
    let ws = Workspace::open(path)?;
    let mut stack = ws.load_stack(stack)?;
    let platform = ws.platform(remote).await?;

    let env = SyncEnv {
        git: &ws.git,
        platform: platform.as_ref(),
        store: &ws.store,
        progress: &CliProgress,
    };
    let options = SyncOptions {
        base_branch: base_branch.map(String::from),
        remote: remote.to_string(),
    };

    let result = sync_stack(&mut stack, &env, &options).await?;

    println!();
    if result.created_mrs.is_empty() && result.removed_branches.is_empty() && !result.force_pushed
    {
        println!("{} {} is up to date", check(), stack.title.emphasis());
        return Ok(());
    }
    println!(
        "{} Synced {}: {} created, {} merged, {} pushed",
        check(),
        stack.title.emphasis(),
        result.created_mrs.len().accent(),
        result.removed_branches.len().accent(),
        result.pushed_branches.len().accent()
    );
    Ok(())
}
