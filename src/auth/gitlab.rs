//! GitLab token discovery

use crate::auth::AuthSource;
use crate::error::{Error, Result};
use crate::types::User;
use reqwest::Client;
use std::env;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in priority order
const TOKEN_VARS: [&str; 2] = ["GITLAB_TOKEN", "GL_TOKEN"];

/// GitLab authentication configuration
#[derive(Debug, Clone)]
pub struct GitLabAuthConfig {
    /// Authentication token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
    /// GitLab host (e.g., "gitlab.com")
    pub host: String,
}

/// Get GitLab authentication
///
/// Priority:
/// 1. glab CLI (`glab auth token`)
/// 2. `GITLAB_TOKEN` environment variable
/// 3. `GL_TOKEN` environment variable
pub async fn get_gitlab_auth(host: Option<&str>) -> Result<GitLabAuthConfig> {
    let host = host
        .map(String::from)
        .or_else(|| env::var("GITLAB_HOST").ok())
        .unwrap_or_else(|| "gitlab.com".to_string());

    if let Some(token) = get_glab_cli_token(&host).await {
        debug!("Using glab CLI token for {host}");
        return Ok(GitLabAuthConfig {
            token,
            source: AuthSource::Cli,
            host,
        });
    }

    token_from_env(|name| env::var(name).ok())
        .map(|token| {
            debug!("Using environment token for {host}");
            GitLabAuthConfig {
                token,
                source: AuthSource::EnvVar,
                host,
            }
        })
        .ok_or_else(|| {
            Error::Auth(
                "No GitLab authentication found. Run `glab auth login` or set GITLAB_TOKEN"
                    .to_string(),
            )
        })
}

fn token_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .map(|token| token.trim().to_string())
        .find(|token| !token.is_empty())
}

async fn get_glab_cli_token(host: &str) -> Option<String> {
    let output = Command::new("glab")
        .args(["auth", "token", "--hostname", host])
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}

/// Test GitLab authentication, returning the authenticated user
pub async fn test_gitlab_auth(config: &GitLabAuthConfig) -> Result<User> {
    let url = format!("https://{}/api/v4/user", config.host);

    let user: User = Client::new()
        .get(&url)
        .header("PRIVATE-TOKEN", &config.token)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::Auth(format!("Invalid token: {e}")))?
        .json()
        .await?;

    Ok(user)
}
