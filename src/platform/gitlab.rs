//! GitLab platform service implementation

use crate::error::{Error, Result};
use crate::platform::MergeRequestService;
use crate::types::{MergeRequest, MergeRequestState, NewMergeRequest, PlatformConfig, User};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: String,
    base_url: String,
    config: PlatformConfig,
}

#[derive(Serialize)]
struct UpdateMrPayload<'a> {
    target_branch: &'a str,
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

impl GitLabService {
    /// Create a new GitLab service for `owner/repo` on `host` (default gitlab.com)
    pub fn new(token: String, owner: String, repo: String, host: Option<String>) -> Self {
        let host = host.unwrap_or_else(|| "gitlab.com".to_string());
        Self::with_base_url(token, owner, repo, &format!("https://{host}"), &host)
    }

    /// Create a service against an explicit base URL (scheme included)
    pub fn with_base_url(
        token: String,
        owner: String,
        repo: String,
        base_url: &str,
        host: &str,
    ) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
            config: PlatformConfig {
                owner,
                repo,
                host: (host != "gitlab.com").then(|| host.to_string()),
            },
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v4{}", self.base_url, path)
    }

    fn project_url(&self, path: &str) -> String {
        let project = urlencoding::encode(&self.config.project_path()).into_owned();
        self.api_url(&format!("/projects/{project}{path}"))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        Ok(request
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?)
    }
}

#[async_trait]
impl MergeRequestService for GitLabService {
    async fn list_merge_requests(
        &self,
        branch: &str,
        state: Option<MergeRequestState>,
    ) -> Result<Vec<MergeRequest>> {
        debug!("Listing MRs for source branch {branch} (state: {state:?})");
        let mut query = vec![
            ("source_branch", branch),
            ("order_by", "created_at"),
            ("sort", "desc"),
        ];
        if let Some(state) = state {
            query.push(("state", state.as_query()));
        }

        self.send(self.client.get(self.project_url("/merge_requests")).query(&query))
            .await
    }

    async fn get_merge_request(&self, iid: u64) -> Result<MergeRequest> {
        debug!("Fetching MR !{iid}");
        self.send(
            self.client
                .get(self.project_url(&format!("/merge_requests/{iid}"))),
        )
        .await
    }

    async fn update_merge_request_target(
        &self,
        iid: u64,
        target_branch: &str,
    ) -> Result<MergeRequest> {
        debug!("Retargeting MR !{iid} to {target_branch}");
        self.send(
            self.client
                .put(self.project_url(&format!("/merge_requests/{iid}")))
                .json(&UpdateMrPayload { target_branch }),
        )
        .await
    }

    async fn create_merge_request(&self, request: &NewMergeRequest) -> Result<MergeRequest> {
        debug!(
            "Creating MR {} -> {}",
            request.source_branch, request.target_branch
        );
        self.send(
            self.client
                .post(self.project_url("/merge_requests"))
                .json(request),
        )
        .await
    }

    async fn current_user(&self) -> Result<User> {
        self.send(self.client.get(self.api_url("/user"))).await
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
