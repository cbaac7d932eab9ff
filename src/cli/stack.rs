//! Stack commands - create, track, show, list, switch and delete stacks

use crate::cli::Workspace;
use crate::cli::style::{Stylize, bullet, check, current};
use anstream::println;
use mr_stack::error::{Error, Result};
use mr_stack::stack::{Stack, StackRef, StackStore};
use std::path::Path;

/// Create an empty stack and make it current
pub fn run_create(path: &Path, title: &str, base_branch: Option<&str>) -> Result<()> {
    let ws = Workspace::open(path)?;
    if ws.store.list()?.iter().any(|t| t == title) {
        return Err(Error::InvalidStack(format!("stack '{title}' already exists")));
    }

    let mut stack = Stack::new(title);
    stack.base_branch = base_branch.map(String::from);
    ws.store.save(&stack)?;
    ws.store.set_current(title)?;

    println!("{} Created stack {}", check(), title.accent());
    Ok(())
}

/// Append a branch to the tail of a stack
///
/// The description defaults to the full message of the branch's tip commit.
pub fn run_track(
    path: &Path,
    stack: Option<&str>,
    branch: &str,
    description: Option<&str>,
) -> Result<()> {
    let ws = Workspace::open(path)?;
    let mut stack = ws.load_stack(stack)?;

    let sha = ws.git.rev_parse(branch)?;
    let description = match description {
        Some(d) => d.to_string(),
        None => ws.git.commit_message(branch)?,
    };

    stack.push(StackRef::new(sha, branch, description))?;
    ws.store.save(&stack)?;

    println!(
        "{} Tracking {} in {} ({} branches)",
        check(),
        branch.accent(),
        stack.title.emphasis(),
        stack.len()
    );
    Ok(())
}

/// Print a stack from head to tail
pub fn run_show(path: &Path, stack: Option<&str>) -> Result<()> {
    let ws = Workspace::open(path)?;
    let stack = ws.load_stack(stack)?;
    let checked_out = ws.git.current_branch().ok();

    println!("{}", stack.title.emphasis());
    if let Some(base) = &stack.base_branch {
        println!("  {}", format!("base: {base}").muted());
    }
    if stack.is_empty() {
        println!("  {}", "(no branches; use `mrs track <branch>`)".muted());
        return Ok(());
    }

    for node in stack.iter() {
        let node = node?;
        let title = node.description.lines().next().unwrap_or_default();
        let short_sha = node.short_sha();
        if checked_out.as_deref() == Some(node.branch.as_str()) {
            print_node(&current(), node, short_sha, title);
        } else {
            print_node(&bullet(), node, short_sha, title);
        }
    }
    Ok(())
}

fn print_node(marker: &dyn std::fmt::Display, node: &StackRef, short_sha: &str, title: &str) {
    println!(
        "  {marker} {} {} {}",
        node.branch.accent(),
        short_sha.muted(),
        title
    );
    if let Some(mr) = &node.mr {
        println!("      {}", mr.muted());
    }
}

/// List stored stacks, marking the current one
pub fn run_list(path: &Path) -> Result<()> {
    let ws = Workspace::open(path)?;
    let active = ws.store.current()?;
    let titles = ws.store.list()?;

    if titles.is_empty() {
        println!("{}", "No stacks yet".muted());
        return Ok(());
    }
    for title in titles {
        if active.as_deref() == Some(title.as_str()) {
            println!("{} {}", current(), title.accent());
        } else {
            println!("{} {title}", bullet());
        }
    }
    Ok(())
}

/// Make an existing stack current
pub fn run_switch(path: &Path, title: &str) -> Result<()> {
    let ws = Workspace::open(path)?;
    ws.store.load(title)?;
    ws.store.set_current(title)?;
    println!("{} Switched to {}", check(), title.accent());
    Ok(())
}

/// Forget a stack; branches and MRs are left alone
pub fn run_delete(path: &Path, title: &str) -> Result<()> {
    let ws = Workspace::open(path)?;
    ws.store.delete(title)?;
    println!("{} Deleted stack {}", check(), title.accent());
    Ok(())
}
