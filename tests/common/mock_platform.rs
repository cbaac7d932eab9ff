//! Mock merge request service for testing
//!
//! Keeps a small in-memory MR table so lookups, retargets and creations
//! interact the way they do against GitLab.

use super::fixtures::mr_url;
use async_trait::async_trait;
use mr_stack::error::{Error, Result};
use mr_stack::platform::MergeRequestService;
use mr_stack::types::{
    MergeRequest, MergeRequestState, NewMergeRequest, PlatformConfig, User,
};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Call record for `list_merge_requests`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListCall {
    pub branch: String,
    pub state: Option<MergeRequestState>,
}

/// Call record for `update_merge_request_target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTargetCall {
    pub iid: u64,
    pub target_branch: String,
}

/// Mock merge request service
///
/// Features:
/// - Auto-incrementing MR iids for created MRs
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockMergeRequestService {
    config: PlatformConfig,
    user: User,
    next_iid: AtomicU64,
    merge_requests: Mutex<Vec<MergeRequest>>,
    // Call tracking
    list_calls: Mutex<Vec<ListCall>>,
    get_calls: Mutex<Vec<u64>>,
    update_calls: Mutex<Vec<UpdateTargetCall>>,
    create_calls: Mutex<Vec<NewMergeRequest>>,
    current_user_calls: AtomicUsize,
    // Error injection
    error_on_list: Mutex<Option<String>>,
    error_on_get: Mutex<Option<String>>,
    error_on_update: Mutex<Option<String>>,
    error_on_create: Mutex<Option<String>>,
}

impl Default for MockMergeRequestService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMergeRequestService {
    pub fn new() -> Self {
        Self {
            config: PlatformConfig {
                owner: "stack_guy".to_string(),
                repo: "stackproject".to_string(),
                host: None,
            },
            user: User {
                id: 7,
                username: "stack_guy".to_string(),
            },
            next_iid: AtomicU64::new(100),
            merge_requests: Mutex::new(Vec::new()),
            list_calls: Mutex::new(Vec::new()),
            get_calls: Mutex::new(Vec::new()),
            update_calls: Mutex::new(Vec::new()),
            create_calls: Mutex::new(Vec::new()),
            current_user_calls: AtomicUsize::new(0),
            error_on_list: Mutex::new(None),
            error_on_get: Mutex::new(None),
            error_on_update: Mutex::new(None),
            error_on_create: Mutex::new(None),
        }
    }

    /// Seed an existing MR
    pub fn add_merge_request(&self, mr: MergeRequest) {
        self.merge_requests.lock().unwrap().push(mr);
    }

    /// The authenticated user returned by `current_user`
    pub fn user(&self) -> &User {
        &self.user
    }

    // === Error injection methods ===

    pub fn fail_list(&self, msg: &str) {
        *self.error_on_list.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_get(&self, msg: &str) {
        *self.error_on_get.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_update(&self, msg: &str) {
        *self.error_on_update.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_create(&self, msg: &str) {
        *self.error_on_create.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    pub fn list_calls(&self) -> Vec<ListCall> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn get_calls(&self) -> Vec<u64> {
        self.get_calls.lock().unwrap().clone()
    }

    pub fn update_calls(&self) -> Vec<UpdateTargetCall> {
        self.update_calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<NewMergeRequest> {
        self.create_calls.lock().unwrap().clone()
    }

    pub fn current_user_calls(&self) -> usize {
        self.current_user_calls.load(Ordering::SeqCst)
    }

    /// Current target branch of the MR for `source`
    pub fn target_of(&self, source: &str) -> Option<String> {
        self.merge_requests
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|mr| mr.source_branch == source)
            .map(|mr| mr.target_branch.clone())
    }

    /// Assert that `update_merge_request_target` was called with specific args
    pub fn assert_update_called(&self, iid: u64, target: &str) {
        let calls = self.update_calls();
        assert!(
            calls
                .iter()
                .any(|c| c.iid == iid && c.target_branch == target),
            "Expected update_merge_request_target({iid}, {target}) but got: {calls:?}"
        );
    }

    fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
        match slot.lock().unwrap().as_ref() {
            Some(msg) => Err(Error::GitLabApi(msg.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MergeRequestService for MockMergeRequestService {
    async fn list_merge_requests(
        &self,
        branch: &str,
        state: Option<MergeRequestState>,
    ) -> Result<Vec<MergeRequest>> {
        self.list_calls.lock().unwrap().push(ListCall {
            branch: branch.to_string(),
            state,
        });
        Self::injected(&self.error_on_list)?;

        let mut found: Vec<MergeRequest> = self
            .merge_requests
            .lock()
            .unwrap()
            .iter()
            .filter(|mr| mr.source_branch == branch)
            .filter(|mr| state.is_none_or(|s| mr.state == s))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.iid.cmp(&a.iid));
        Ok(found)
    }

    async fn get_merge_request(&self, iid: u64) -> Result<MergeRequest> {
        self.get_calls.lock().unwrap().push(iid);
        Self::injected(&self.error_on_get)?;
        self.merge_requests
            .lock()
            .unwrap()
            .iter()
            .find(|mr| mr.iid == iid)
            .cloned()
            .ok_or_else(|| Error::GitLabApi(format!("404 merge request !{iid} not found")))
    }

    async fn update_merge_request_target(
        &self,
        iid: u64,
        target_branch: &str,
    ) -> Result<MergeRequest> {
        self.update_calls.lock().unwrap().push(UpdateTargetCall {
            iid,
            target_branch: target_branch.to_string(),
        });
        Self::injected(&self.error_on_update)?;

        let mut mrs = self.merge_requests.lock().unwrap();
        let mr = mrs
            .iter_mut()
            .find(|mr| mr.iid == iid)
            .ok_or_else(|| Error::GitLabApi(format!("404 merge request !{iid} not found")))?;
        mr.target_branch = target_branch.to_string();
        Ok(mr.clone())
    }

    async fn create_merge_request(&self, request: &NewMergeRequest) -> Result<MergeRequest> {
        self.create_calls.lock().unwrap().push(request.clone());
        Self::injected(&self.error_on_create)?;

        let iid = self.next_iid.fetch_add(1, Ordering::SeqCst);
        let mr = MergeRequest {
            iid,
            project_id: 3,
            web_url: mr_url(iid),
            source_branch: request.source_branch.clone(),
            target_branch: request.target_branch.clone(),
            title: request.title.clone(),
            description: Some(request.description.clone()),
            state: MergeRequestState::Opened,
        };
        self.merge_requests.lock().unwrap().push(mr.clone());
        Ok(mr)
    }

    async fn current_user(&self) -> Result<User> {
        self.current_user_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.user.clone())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
