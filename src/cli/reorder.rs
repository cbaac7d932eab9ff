//! Reorder command - change branch order and retarget MRs

use crate::cli::Workspace;
use crate::cli::progress::CliProgress;
use crate::cli::style::{Stylize, arrow, check};
use anstream::println;
use dialoguer::Editor;
use mr_stack::error::{Error, Result};
use mr_stack::stack::{Stack, StackStore, reorder};
use mr_stack::sync::{plan_target_changes, update_mr_targets};
use std::path::Path;

const EDITOR_HELP: &str = "\
# Reorder the branches of this stack, one per line, head first.
# Every branch must appear exactly once. Lines starting with '#' are ignored.
";

/// Run the reorder command
///
/// Without `branches` the current order is opened in `$EDITOR`.
pub async fn run_reorder(
    path: &Path,
    stack: Option<&str>,
    branches: Vec<String>,
    remote: &str,
    dry_run: bool,
) -> Result<()> {
    let ws = Workspace::open(path)?;
    let old = ws.load_stack(stack)?;

    let branches = if branches.is_empty() {
        match edit_order(&old)? {
            Some(order) => order,
            None => {
                println!("{}", "Reorder cancelled".muted());
                return Ok(());
            }
        }
    } else {
        branches
    };

    let new = reorder(&old, &branches)?;
    let base = ws.base_branch(&old, remote)?;

    if dry_run {
        let changes = plan_target_changes(&old, &new, &base)?;
        println!("{}", "Dry run - no changes made".muted());
        if changes.is_empty() {
            println!("  No merge requests need a new target");
        }
        for change in changes {
            println!(
                "  {}: {} {} {}",
                change.branch.accent(),
                change.old_target.muted(),
                arrow(),
                change.new_target.accent()
            );
        }
        return Ok(());
    }

    ws.store.save(&new)?;
    println!("{} Reordered {}", check(), new.title.emphasis());

    let needs_platform = !plan_target_changes(&old, &new, &base)?.is_empty();
    if needs_platform {
        let platform = ws.platform(remote).await?;
        let updated = update_mr_targets(&old, &new, &base, platform.as_ref(), &CliProgress).await?;
        println!("{} Retargeted {} merge requests", check(), updated.len().accent());
    }
    Ok(())
}

fn edit_order(stack: &Stack) -> Result<Option<Vec<String>>> {
    let mut text = stack.branches()?.join("\n");
    text.push_str("\n\n");
    text.push_str(EDITOR_HELP);

    let edited = Editor::new()
        .extension(".txt")
        .edit(&text)
        .map_err(|e| Error::Internal(format!("editor failed: {e}")))?;

    Ok(edited.map(|text| parse_order(&text)))
}

fn parse_order(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
