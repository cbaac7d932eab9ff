//! Project detection from remote URLs

use crate::error::{Error, Result};
use crate::types::PlatformConfig;
use regex::Regex;
use std::env;
use std::sync::LazyLock;

// SSH format: git@host:group/repo.git
static SSH_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"git@[^:]+:(.+?)(?:\.git)?/?$").expect("valid regex"));
// HTTPS format: https://host/group/repo.git
static HTTPS_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:https?|ssh)://[^/]+/(.+?)(?:\.git)?/?$").expect("valid regex")
});

/// Whether a hostname belongs to a GitLab instance
///
/// gitlab.com and its subdomains always match; a self-hosted instance matches
/// when it is named by `GITLAB_HOST`.
pub fn is_gitlab_host(hostname: &str) -> bool {
    let gitlab_host = env::var("GITLAB_HOST").ok();

    hostname == "gitlab.com"
        || hostname.ends_with(".gitlab.com")
        || gitlab_host.is_some_and(|h| hostname == h.trim_start_matches("https://"))
}

/// Parse project info (namespace/repo/host) from a GitLab remote URL
pub fn parse_repo_info(url: &str) -> Result<PlatformConfig> {
    let hostname = extract_hostname(url).ok_or(Error::NoSupportedRemotes)?;
    if !is_gitlab_host(&hostname) {
        return Err(Error::NoSupportedRemotes);
    }

    let path = SSH_URL
        .captures(url)
        .or_else(|| HTTPS_URL.captures(url))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Parse(format!("cannot parse remote URL: {url}")))?;

    // GitLab supports nested groups: everything before the last segment
    let Some((owner, repo)) = path.rsplit_once('/') else {
        return Err(Error::Parse(format!("invalid project path: {path}")));
    };

    Ok(PlatformConfig {
        owner: owner.to_string(),
        repo: repo.to_string(),
        host: (hostname != "gitlab.com").then_some(hostname),
    })
}

fn extract_hostname(url: &str) -> Option<String> {
    // SSH format
    if let Some(rest) = url.strip_prefix("git@") {
        return rest.split(':').next().map(ToString::to_string);
    }

    // HTTPS format
    url::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(ToString::to_string))
}
