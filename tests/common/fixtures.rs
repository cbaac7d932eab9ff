//! Test data factories for mr-stack types

use mr_stack::stack::{Stack, StackRef};
use mr_stack::types::{MergeRequest, MergeRequestState};

pub const PROJECT_URL: &str = "https://gitlab.com/stack_guy/stackproject";

/// Web URL of MR `iid` in the test project
pub fn mr_url(iid: u64) -> String {
    format!("{PROJECT_URL}/-/merge_requests/{iid}")
}

/// Create a merge request in the test project
pub fn make_mr(iid: u64, source: &str, target: &str, state: MergeRequestState) -> MergeRequest {
    MergeRequest {
        iid,
        project_id: 3,
        web_url: mr_url(iid),
        source_branch: source.to_string(),
        target_branch: target.to_string(),
        title: format!("MR for {source}"),
        description: None,
        state,
    }
}

/// Create an open merge request
pub fn make_open_mr(iid: u64, source: &str, target: &str) -> MergeRequest {
    make_mr(iid, source, target, MergeRequestState::Opened)
}

/// Stack of `n` refs with SHAs "1".."n" and branches "Branch1".."BranchN"
pub fn linear_stack(title: &str, n: usize) -> Stack {
    let mut stack = Stack::new(title);
    for i in 1..=n {
        stack
            .push(StackRef::new(i.to_string(), format!("Branch{i}"), ""))
            .unwrap();
    }
    stack
}

/// Branch name for a numbered fixture node
pub fn branch(i: usize) -> String {
    format!("Branch{i}")
}

/// Traversal order as branch names
pub fn order(stack: &Stack) -> Vec<String> {
    stack.branches().unwrap()
}
