//! Retargeting MRs after a reorder

mod common;

use common::{MockMergeRequestService, branch, linear_stack, make_open_mr, mr_url};
use mr_stack::stack::{Stack, reorder};
use mr_stack::sync::{NoopProgress, plan_target_changes, update_mr_targets};
use mr_stack::types::MergeRequestState;

const NEW_ORDER: [usize; 13] = [7, 5, 8, 1, 9, 4, 2, 3, 6, 10, 12, 11, 13];

/// Thirteen branches in order, MRs on the first ten
fn complex_stack(platform: &MockMergeRequestService) -> Stack {
    let mut stack = linear_stack("my cool stack", 13);
    for i in 1..=10 {
        let target = if i == 1 { "main".to_string() } else { branch(i - 1) };
        platform.add_merge_request(make_open_mr(i as u64, &branch(i), &target));
        stack.set_mr(&i.to_string(), Some(mr_url(i as u64))).unwrap();
    }
    stack
}

fn new_order() -> Vec<String> {
    NEW_ORDER.iter().map(|&i| branch(i)).collect()
}

#[tokio::test]
async fn test_update_complex_stack() {
    let platform = MockMergeRequestService::new();
    let old = complex_stack(&platform);
    let new = reorder(&old, &new_order()).unwrap();

    let updated = update_mr_targets(&old, &new, "main", &platform, &NoopProgress)
        .await
        .unwrap();

    let expected = [
        (7, "main"),
        (5, "Branch7"),
        (8, "Branch5"),
        (1, "Branch8"),
        (9, "Branch1"),
        (4, "Branch9"),
        (2, "Branch4"),
        (6, "Branch3"),
        (10, "Branch6"),
    ];
    let calls = platform.update_calls();
    assert_eq!(calls.len(), expected.len(), "calls: {calls:?}");
    for (call, (iid, target)) in calls.iter().zip(expected) {
        assert_eq!(call.iid, iid);
        assert_eq!(call.target_branch, target);
    }
    assert_eq!(updated.len(), expected.len());

    // Branch3 still sits on Branch2, so its MR is left alone
    assert_eq!(platform.target_of("Branch3").as_deref(), Some("Branch2"));
    assert!(!calls.iter().any(|c| c.iid == 3));
}

#[tokio::test]
async fn test_lookups_use_open_mrs_then_fetch() {
    let platform = MockMergeRequestService::new();
    let old = complex_stack(&platform);
    let new = reorder(&old, &new_order()).unwrap();

    update_mr_targets(&old, &new, "main", &platform, &NoopProgress)
        .await
        .unwrap();

    let lists = platform.list_calls();
    assert_eq!(lists.first().map(|c| c.branch.as_str()), Some("Branch7"));
    assert!(
        lists
            .iter()
            .all(|c| c.state == Some(MergeRequestState::Opened))
    );
    assert_eq!(platform.get_calls(), vec![7, 5, 8, 1, 9, 4, 2, 6, 10]);
}

#[tokio::test]
async fn test_branches_without_mr_are_never_looked_up() {
    let platform = MockMergeRequestService::new();
    let old = complex_stack(&platform);
    let new = reorder(&old, &new_order()).unwrap();

    update_mr_targets(&old, &new, "main", &platform, &NoopProgress)
        .await
        .unwrap();

    let looked_up: Vec<String> = platform.list_calls().into_iter().map(|c| c.branch).collect();
    for i in 11..=13 {
        assert!(!looked_up.contains(&branch(i)));
    }
}

#[tokio::test]
async fn test_skips_branch_without_open_mr() {
    let platform = MockMergeRequestService::new();
    let mut old = linear_stack("partial", 2);
    old.set_mr("1", Some(mr_url(1))).unwrap();
    old.set_mr("2", Some(mr_url(2))).unwrap();
    platform.add_merge_request(make_open_mr(2, "Branch2", "Branch1"));
    let new = reorder(&old, &["Branch2", "Branch1"]).unwrap();

    let updated = update_mr_targets(&old, &new, "main", &platform, &NoopProgress)
        .await
        .unwrap();

    assert_eq!(updated.len(), 1);
    platform.assert_update_called(2, "main");
    assert_eq!(platform.list_calls().len(), 2);
}

#[tokio::test]
async fn test_first_failure_aborts_and_names_branch() {
    let platform = MockMergeRequestService::new();
    let old = complex_stack(&platform);
    let new = reorder(&old, &new_order()).unwrap();
    platform.fail_update("500 Internal Server Error");

    let err = update_mr_targets(&old, &new, "main", &platform, &NoopProgress)
        .await
        .unwrap_err();

    assert_eq!(err.branch(), Some("Branch7"));
    assert!(err.to_string().contains("500 Internal Server Error"));
    assert_eq!(platform.update_calls().len(), 1);
}

#[tokio::test]
async fn test_list_failure_aborts_before_any_update() {
    let platform = MockMergeRequestService::new();
    let old = complex_stack(&platform);
    let new = reorder(&old, &new_order()).unwrap();
    platform.fail_list("502 Bad Gateway");

    let err = update_mr_targets(&old, &new, "main", &platform, &NoopProgress)
        .await
        .unwrap_err();

    assert_eq!(err.branch(), Some("Branch7"));
    assert!(err.to_string().contains("502 Bad Gateway"));
    assert_eq!(platform.list_calls().len(), 1);
    assert!(platform.get_calls().is_empty());
    assert!(platform.update_calls().is_empty());
}

#[tokio::test]
async fn test_get_failure_aborts_before_any_update() {
    let platform = MockMergeRequestService::new();
    let old = complex_stack(&platform);
    let new = reorder(&old, &new_order()).unwrap();
    platform.fail_get("403 Forbidden");

    let err = update_mr_targets(&old, &new, "main", &platform, &NoopProgress)
        .await
        .unwrap_err();

    assert_eq!(err.branch(), Some("Branch7"));
    assert!(err.to_string().contains("403 Forbidden"));
    assert_eq!(platform.get_calls(), vec![7]);
    assert!(platform.update_calls().is_empty());
    assert_eq!(platform.target_of("Branch7").as_deref(), Some("Branch6"));
}

#[tokio::test]
async fn test_stack_base_branch_is_the_head_target() {
    let platform = MockMergeRequestService::new();
    let mut old = linear_stack("based", 2);
    old.base_branch = Some("develop".to_string());
    for i in 1..=2 {
        old.set_mr(&i.to_string(), Some(mr_url(i as u64))).unwrap();
    }
    platform.add_merge_request(make_open_mr(1, "Branch1", "develop"));
    platform.add_merge_request(make_open_mr(2, "Branch2", "Branch1"));
    let new = reorder(&old, &["Branch2", "Branch1"]).unwrap();

    update_mr_targets(&old, &new, "main", &platform, &NoopProgress)
        .await
        .unwrap();

    assert_eq!(platform.target_of("Branch2").as_deref(), Some("develop"));
    assert_eq!(platform.target_of("Branch1").as_deref(), Some("Branch2"));
}

#[test]
fn test_plan_matches_updates() {
    let platform = MockMergeRequestService::new();
    let old = complex_stack(&platform);
    let new = reorder(&old, &new_order()).unwrap();

    let plan = plan_target_changes(&old, &new, "main").unwrap();

    let branches: Vec<&str> = plan.iter().map(|c| c.branch.as_str()).collect();
    assert_eq!(
        branches,
        vec![
            "Branch7", "Branch5", "Branch8", "Branch1", "Branch9", "Branch4", "Branch2", "Branch6",
            "Branch10"
        ]
    );
    assert_eq!(plan[0].old_target, "Branch6");
    assert_eq!(plan[0].new_target, "main");
}
