//! Stack reordering
//!
//! Rebuilds the prev/next links of a stack so its traversal order matches an
//! explicit list of branch names. Ref content is carried over untouched.

use crate::error::{Error, Result};
use crate::stack::{Stack, StackRef};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Produce a copy of `stack` whose head-to-tail order is `branches`
///
/// `branches` must name every branch of the stack exactly once. Any
/// missing, unknown or repeated name fails with [`Error::MissingBranches`].
pub fn reorder<S: AsRef<str>>(stack: &Stack, branches: &[S]) -> Result<Stack> {
    let by_branch: HashMap<&str, &StackRef> = stack
        .refs
        .values()
        .map(|r| (r.branch.as_str(), r))
        .collect();

    let mut seen = HashSet::new();
    let mut duplicated = Vec::new();
    let mut unknown = Vec::new();
    for branch in branches {
        let branch = branch.as_ref();
        if !seen.insert(branch) && !duplicated.iter().any(|d| d == branch) {
            duplicated.push(branch.to_string());
        }
        if !by_branch.contains_key(branch) && !unknown.iter().any(|u| u == branch) {
            unknown.push(branch.to_string());
        }
    }

    // keep the report in stack order when the stack is walkable
    let stack_order = stack
        .branches()
        .unwrap_or_else(|_| by_branch.keys().map(ToString::to_string).collect());
    let missing: Vec<String> = stack_order
        .into_iter()
        .filter(|b| !seen.contains(b.as_str()))
        .collect();

    if !missing.is_empty() || !unknown.is_empty() || !duplicated.is_empty() {
        return Err(Error::MissingBranches {
            missing,
            unknown,
            duplicated,
        });
    }

    let shas: Vec<&str> = branches
        .iter()
        .map(|b| by_branch[b.as_ref()].sha.as_str())
        .collect();

    let mut refs = BTreeMap::new();
    for (i, branch) in branches.iter().enumerate() {
        let original = by_branch[branch.as_ref()];
        let relinked = StackRef {
            prev: i.checked_sub(1).map(|p| shas[p].to_string()),
            next: shas.get(i + 1).map(ToString::to_string),
            ..original.clone()
        };
        debug!(
            "  {} -> prev {:?}, next {:?}",
            relinked.branch, relinked.prev, relinked.next
        );
        refs.insert(relinked.sha.clone(), relinked);
    }

    Ok(Stack {
        title: stack.title.clone(),
        base_branch: stack.base_branch.clone(),
        refs,
    })
}
