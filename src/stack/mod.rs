//! Stack model
//!
//! A stack is an ordered chain of branches stored as a flat map keyed by
//! commit SHA. Each [`StackRef`] names its neighbours by SHA, forming a doubly
//! linked list without any pointers between nodes.

mod reorder;
mod store;

pub use reorder::reorder;
pub use store::{FileStackStore, StackStore};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// One node of a stack: a commit bound to a branch and, optionally, an MR
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackRef {
    /// Commit SHA identifying this node
    pub sha: String,
    /// SHA of the previous node (None for the head)
    #[serde(default)]
    pub prev: Option<String>,
    /// SHA of the next node (None for the tail)
    #[serde(default)]
    pub next: Option<String>,
    /// Local branch name
    pub branch: String,
    /// Changeset description (first line becomes the MR title)
    #[serde(default)]
    pub description: String,
    /// Web URL of the merge request, once one exists
    #[serde(default)]
    pub mr: Option<String>,
}

impl StackRef {
    /// Create an unlinked ref
    pub fn new(
        sha: impl Into<String>,
        branch: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            sha: sha.into(),
            prev: None,
            next: None,
            branch: branch.into(),
            description: description.into(),
            mr: None,
        }
    }

    /// Whether this ref is the head of its stack
    pub const fn is_first(&self) -> bool {
        self.prev.is_none()
    }

    /// Whether this ref is the tail of its stack
    pub const fn is_last(&self) -> bool {
        self.next.is_none()
    }

    /// First eight characters of the SHA, or all of it when it is shorter
    /// or not cut on a character boundary
    pub fn short_sha(&self) -> &str {
        self.sha.get(..8).unwrap_or(&self.sha)
    }
}

/// A named stack of refs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stack {
    /// Stack title
    pub title: String,
    /// Branch the head's MR targets; falls back to the remote default branch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_branch: Option<String>,
    /// All refs keyed by SHA
    #[serde(default)]
    pub refs: BTreeMap<String, StackRef>,
}

impl Stack {
    /// Create an empty stack
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            base_branch: None,
            refs: BTreeMap::new(),
        }
    }

    /// Number of refs
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// Whether the stack has no refs
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Look up a ref by SHA
    pub fn get(&self, sha: &str) -> Result<&StackRef> {
        self.refs
            .get(sha)
            .ok_or_else(|| Error::RefNotFound(sha.to_string()))
    }

    /// Look up a ref by SHA for mutation
    pub fn get_mut(&mut self, sha: &str) -> Result<&mut StackRef> {
        self.refs
            .get_mut(sha)
            .ok_or_else(|| Error::RefNotFound(sha.to_string()))
    }

    /// Find the ref tracking a branch
    pub fn find_by_branch(&self, branch: &str) -> Option<&StackRef> {
        self.refs.values().find(|r| r.branch == branch)
    }

    /// The head ref
    pub fn first(&self) -> Result<&StackRef> {
        if self.is_empty() {
            return Err(Error::EmptyStack);
        }
        self.unique(|r| r.prev.is_none(), "head")
    }

    /// The tail ref
    pub fn last(&self) -> Result<&StackRef> {
        if self.is_empty() {
            return Err(Error::EmptyStack);
        }
        self.unique(|r| r.next.is_none(), "tail")
    }

    fn unique(&self, pred: impl Fn(&StackRef) -> bool, what: &str) -> Result<&StackRef> {
        let mut found = self.refs.values().filter(|r| pred(r));
        match (found.next(), found.next()) {
            (Some(r), None) => Ok(r),
            (None, _) => Err(Error::InvalidStack(format!("stack '{}' has no {what}", self.title))),
            (Some(_), Some(_)) => Err(Error::InvalidStack(format!(
                "stack '{}' has more than one {what}",
                self.title
            ))),
        }
    }

    /// Iterate refs from head to tail
    ///
    /// The walk never takes more than `len()` steps. A broken link, a cycle or
    /// a missing head yields one `InvalidStack` error and ends the iteration.
    pub fn iter(&self) -> StackIter<'_> {
        let pending = if self.is_empty() {
            None
        } else {
            Some(self.first())
        };

        StackIter {
            stack: self,
            pending,
            remaining: self.len(),
        }
    }

    /// Refs in head-to-tail order
    pub fn ordered(&self) -> Result<Vec<&StackRef>> {
        self.iter().collect()
    }

    /// Branch names in head-to-tail order
    pub fn branches(&self) -> Result<Vec<String>> {
        self.iter().map(|r| r.map(|r| r.branch.clone())).collect()
    }

    /// The ref before `sha`, or None if `sha` is the head
    pub fn previous(&self, sha: &str) -> Result<Option<&StackRef>> {
        match &self.get(sha)?.prev {
            Some(prev) => self.get(prev).map(Some),
            None => Ok(None),
        }
    }

    /// Branch the MR for `sha` should target
    pub fn target_branch(&self, sha: &str, base_branch: &str) -> Result<String> {
        Ok(self
            .previous(sha)?
            .map_or_else(|| base_branch.to_string(), |prev| prev.branch.clone()))
    }

    /// Set or clear the MR URL of a ref
    pub fn set_mr(&mut self, sha: &str, mr: Option<String>) -> Result<()> {
        self.get_mut(sha)?.mr = mr;
        Ok(())
    }

    /// Append a ref as the new tail
    pub fn push(&mut self, mut stack_ref: StackRef) -> Result<()> {
        if self.refs.contains_key(&stack_ref.sha) {
            return Err(Error::InvalidStack(format!(
                "commit {} is already in stack '{}'",
                stack_ref.sha, self.title
            )));
        }
        if self.find_by_branch(&stack_ref.branch).is_some() {
            return Err(Error::DuplicateBranch(stack_ref.branch));
        }

        let tail = if self.is_empty() {
            None
        } else {
            Some(self.last()?.sha.clone())
        };

        if let Some(tail) = &tail {
            self.get_mut(tail)?.next = Some(stack_ref.sha.clone());
        }
        stack_ref.prev = tail;
        stack_ref.next = None;
        self.refs.insert(stack_ref.sha.clone(), stack_ref);
        Ok(())
    }

    /// Unlink a ref, joining its neighbours to each other
    pub fn remove(&mut self, sha: &str) -> Result<StackRef> {
        let removed = self
            .refs
            .remove(sha)
            .ok_or_else(|| Error::RefNotFound(sha.to_string()))?;

        if let Some(prev) = &removed.prev {
            self.get_mut(prev)?.next.clone_from(&removed.next);
        }
        if let Some(next) = &removed.next {
            self.get_mut(next)?.prev.clone_from(&removed.prev);
        }

        Ok(removed)
    }

    /// Check every structural invariant of the stack
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        self.first()?;
        self.last()?;

        let mut branches = HashSet::new();
        for (key, r) in &self.refs {
            if *key != r.sha {
                return Err(Error::InvalidStack(format!(
                    "ref keyed by {key} carries SHA {}",
                    r.sha
                )));
            }
            if !branches.insert(r.branch.as_str()) {
                return Err(Error::DuplicateBranch(r.branch.clone()));
            }
            if let Some(next) = &r.next {
                let next_ref = self.refs.get(next).ok_or_else(|| {
                    Error::InvalidStack(format!("{} links to missing next {next}", r.sha))
                })?;
                if next_ref.prev.as_deref() != Some(r.sha.as_str()) {
                    return Err(Error::InvalidStack(format!(
                        "{} -> {next} is not linked back",
                        r.sha
                    )));
                }
            }
            if let Some(prev) = &r.prev {
                let prev_ref = self.refs.get(prev).ok_or_else(|| {
                    Error::InvalidStack(format!("{} links to missing prev {prev}", r.sha))
                })?;
                if prev_ref.next.as_deref() != Some(r.sha.as_str()) {
                    return Err(Error::InvalidStack(format!(
                        "{prev} <- {} is not linked forward",
                        r.sha
                    )));
                }
            }
        }

        let visited = self.ordered()?.len();
        if visited != self.len() {
            return Err(Error::InvalidStack(format!(
                "only {visited} of {} refs are reachable from the head",
                self.len()
            )));
        }

        Ok(())
    }
}

/// Head-to-tail iterator over a [`Stack`]
pub struct StackIter<'a> {
    stack: &'a Stack,
    pending: Option<Result<&'a StackRef>>,
    remaining: usize,
}

impl<'a> Iterator for StackIter<'a> {
    type Item = Result<&'a StackRef>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = match self.pending.take()? {
            Ok(current) => current,
            Err(e) => return Some(Err(e)),
        };

        if self.remaining == 0 {
            return Some(Err(Error::InvalidStack(format!(
                "cycle detected in stack '{}' at {}",
                self.stack.title, current.sha
            ))));
        }
        self.remaining -= 1;

        self.pending = current.next.as_ref().map(|next| {
            self.stack.refs.get(next).ok_or_else(|| {
                Error::InvalidStack(format!("{} links to missing next {next}", current.sha))
            })
        });

        Some(Ok(current))
    }
}
