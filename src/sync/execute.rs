//! Stack synchronization
//!
//! Walks a stack from head to tail, bringing each local branch in line with
//! its upstream, pushing new branches, then creating the MRs that are
//! missing. Nodes are handled strictly in order because later branches are
//! rebased onto earlier ones. Nothing is rolled back on failure.

use crate::error::{Error, Result};
use crate::git::{GitRunner, SyncState, parse_default_branch};
use crate::platform::MergeRequestService;
use crate::stack::{Stack, StackRef, StackStore};
use crate::sync::{Phase, ProgressCallback, PushStatus};
use crate::types::{MergeRequest, MergeRequestState, NewMergeRequest, User, split_description};
use tracing::{debug, info, warn};

/// Collaborators used by a sync run
pub struct SyncEnv<'a> {
    /// Git runner for the working copy
    pub git: &'a dyn GitRunner,
    /// Merge request service for the project
    pub platform: &'a dyn MergeRequestService,
    /// Store receiving stack updates as they happen
    pub store: &'a dyn StackStore,
    /// Progress reporting
    pub progress: &'a dyn ProgressCallback,
}

/// Options for a sync run
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Base branch for the head's MR, overriding the stack and remote default
    pub base_branch: Option<String>,
    /// Remote to fetch from and push to
    pub remote: String,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            base_branch: None,
            remote: "origin".to_string(),
        }
    }
}

/// Outcome of a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncResult {
    /// MRs created during the run
    pub created_mrs: Vec<MergeRequest>,
    /// Branches pushed with upstream tracking
    pub pushed_branches: Vec<String>,
    /// Branches dropped from the stack because their MR was merged
    pub removed_branches: Vec<String>,
    /// Whether the final force-with-lease push ran
    pub force_pushed: bool,
}

/// Synchronize `stack` with its remote branches and MRs
///
/// The stack is updated in place and saved through `env.store` whenever an
/// MR link changes, so a failure part way keeps the progress made so far.
/// Errors raised while handling a node are wrapped with its branch name.
pub async fn sync_stack(
    stack: &mut Stack,
    env: &SyncEnv<'_>,
    options: &SyncOptions,
) -> Result<SyncResult> {
    stack.validate()?;

    let mut syncer = Syncer {
        env,
        options,
        push_needed: false,
        base_branch: None,
        user: None,
        result: SyncResult::default(),
    };

    if let Err(e) = syncer.run(stack).await {
        env.progress.on_error(&e).await;
        return Err(e);
    }

    Ok(syncer.result)
}

struct Syncer<'e, 'a> {
    env: &'e SyncEnv<'a>,
    options: &'e SyncOptions,
    push_needed: bool,
    base_branch: Option<String>,
    user: Option<User>,
    result: SyncResult,
}

impl Syncer<'_, '_> {
    fn git(&self, args: &[&str]) -> Result<String> {
        self.env.git.git(args)
    }

    async fn run(&mut self, stack: &mut Stack) -> Result<()> {
        let remote = self.options.remote.clone();
        let progress = self.env.progress;

        progress.on_phase(Phase::Fetching).await;
        self.git(&["fetch", &remote])?;

        let order: Vec<String> = stack
            .iter()
            .map(|r| r.map(|r| r.sha.clone()))
            .collect::<Result<_>>()?;

        progress.on_phase(Phase::SyncingBranches).await;
        for sha in &order {
            let branch = stack.get(sha)?.branch.clone();
            self.sync_ref(stack, sha)
                .await
                .map_err(|e| e.on_branch(&branch))?;
        }

        let missing: Vec<(String, String)> = stack
            .ordered()?
            .into_iter()
            .filter(|r| r.mr.is_none())
            .map(|r| (r.sha.clone(), r.branch.clone()))
            .collect();

        if !missing.is_empty() {
            progress.on_phase(Phase::CreatingMrs).await;
        }
        for (sha, branch) in &missing {
            self.create_mr(stack, sha)
                .await
                .map_err(|e| e.on_branch(branch))?;
        }

        if self.push_needed {
            progress.on_phase(Phase::Pushing).await;
            self.push_all(stack, &remote)?;
        }

        progress.on_phase(Phase::Complete).await;
        Ok(())
    }

    async fn sync_ref(&mut self, stack: &mut Stack, sha: &str) -> Result<()> {
        let node = stack.get(sha)?.clone();
        let progress = self.env.progress;

        if node.mr.is_some() && !self.check_existing_mr(stack, &node).await? {
            return Ok(());
        }

        self.git(&["checkout", &node.branch])?;
        let status = self.git(&["status", "-uno"])?;
        let state = SyncState::from_status(&node.branch, &status)?;
        debug!("{} is {state}", node.branch);
        progress.on_branch_state(&node.branch, state).await;

        match state {
            SyncState::NothingToCommit | SyncState::BranchIsAhead => {}
            SyncState::BranchIsBehind => {
                info!("Fast-forwarding {}", node.branch);
                self.git(&["pull"])?;
            }
            SyncState::BranchHasDiverged => {
                let tail = stack.last()?.branch.clone();
                info!("Rebasing {} from {tail}", node.branch);
                self.git(&["checkout", &tail])?;
                self.git(&["rebase", "--fork-point", "--update-refs", &node.branch])?;
                self.git(&["checkout", &node.branch])?;
            }
        }
        self.push_needed |= state.needs_push();

        let (needs_mr, is_head) = {
            let current = stack.get(sha)?;
            (current.mr.is_none(), current.is_first())
        };
        if needs_mr {
            if is_head {
                self.resolve_base_branch(stack)?;
            }

            let remote = self.options.remote.clone();
            progress
                .on_branch_push(&node.branch, PushStatus::Started)
                .await;
            if let Err(e) = self.git(&["push", "--set-upstream", &remote, &node.branch]) {
                progress
                    .on_branch_push(&node.branch, PushStatus::Failed(e.to_string()))
                    .await;
                return Err(e);
            }
            progress
                .on_branch_push(&node.branch, PushStatus::Success)
                .await;
            self.result.pushed_branches.push(node.branch.clone());
        }

        Ok(())
    }

    /// Reconcile a ref that already links an MR; false means the ref is gone
    async fn check_existing_mr(&mut self, stack: &mut Stack, node: &StackRef) -> Result<bool> {
        let platform = self.env.platform;
        let found = platform.list_merge_requests(&node.branch, None).await?;

        let Some(latest) = found.first() else {
            warn!("No MR found for {}; a new one will be created", node.branch);
            stack.set_mr(&node.sha, None)?;
            self.env.store.save(stack)?;
            return Ok(true);
        };

        let mr = platform.get_merge_request(latest.iid).await?;
        match mr.state {
            MergeRequestState::Merged => {
                info!("!{} for {} was merged; removing it from the stack", mr.iid, node.branch);
                stack.remove(&node.sha)?;
                self.env.store.save(stack)?;
                self.env.progress.on_branch_removed(&node.branch).await;
                self.result.removed_branches.push(node.branch.clone());
                Ok(false)
            }
            MergeRequestState::Closed => {
                warn!("!{} for {} was closed; a new one will be created", mr.iid, node.branch);
                stack.set_mr(&node.sha, None)?;
                self.env.store.save(stack)?;
                Ok(true)
            }
            MergeRequestState::Opened | MergeRequestState::Locked => Ok(true),
        }
    }

    /// Base branch for the head: option, then stack setting, then remote default
    fn resolve_base_branch(&mut self, stack: &mut Stack) -> Result<String> {
        if let Some(base) = &self.base_branch {
            return Ok(base.clone());
        }

        let remote = self.options.remote.clone();
        let base = match self
            .options
            .base_branch
            .clone()
            .or_else(|| stack.base_branch.clone())
        {
            Some(base) => base,
            None => {
                let output = self.git(&["remote", "show", &remote])?;
                parse_default_branch(&output)
                    .ok_or_else(|| Error::DefaultBranchNotFound(remote.clone()))?
            }
        };

        // `--exit-code` exits with 2 when no ref matched
        self.git(&["ls-remote", "--exit-code", "--heads", &remote, &base])
            .map_err(|e| match e {
                Error::Git { code: Some(2), .. } => Error::BaseBranchNotOnRemote {
                    branch: base.clone(),
                    remote: remote.clone(),
                },
                other => other,
            })?;
        debug!("Base branch for stack '{}' is {base}", stack.title);

        if self.options.base_branch.is_some() && stack.base_branch.as_ref() != Some(&base) {
            stack.base_branch = Some(base.clone());
            self.env.store.save(stack)?;
        }

        self.base_branch = Some(base.clone());
        Ok(base)
    }

    async fn assignee(&mut self) -> Result<u64> {
        if let Some(user) = &self.user {
            return Ok(user.id);
        }
        let user = self.env.platform.current_user().await?;
        let id = user.id;
        self.user = Some(user);
        Ok(id)
    }

    async fn create_mr(&mut self, stack: &mut Stack, sha: &str) -> Result<()> {
        let node = stack.get(sha)?.clone();
        let previous = stack.previous(sha)?.map(|prev| prev.branch.clone());
        let target = match previous {
            Some(branch) => branch,
            None => self.resolve_base_branch(stack)?,
        };

        let (mut title, description) = split_description(&node.description);
        if title.is_empty() {
            title.clone_from(&node.branch);
        }

        let request = NewMergeRequest {
            source_branch: node.branch.clone(),
            target_branch: target,
            title,
            description,
            assignee_id: Some(self.assignee().await?),
            remove_source_branch: true,
        };

        let mr = self.env.platform.create_merge_request(&request).await?;
        info!("Created !{} for {} -> {}", mr.iid, node.branch, request.target_branch);

        stack.set_mr(sha, Some(mr.web_url.clone()))?;
        self.env.store.save(stack)?;
        self.env.progress.on_mr_created(&node.branch, &mr).await;
        self.result.created_mrs.push(mr);
        Ok(())
    }

    fn push_all(&mut self, stack: &Stack, remote: &str) -> Result<()> {
        let branches = stack.branches()?;
        if branches.is_empty() {
            return Ok(());
        }

        let mut args = vec!["push", remote, "--force-with-lease"];
        args.extend(branches.iter().map(String::as_str));
        self.git(&args)?;

        info!("Force-pushed {} branches", branches.len());
        self.result.force_pushed = true;
        Ok(())
    }
}
