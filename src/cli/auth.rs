//! Auth command - test and explain GitLab authentication

use crate::cli::style::{Stylize, check};
use anstream::println;
use mr_stack::auth::{get_gitlab_auth, test_gitlab_auth};
use mr_stack::error::Result;

/// Check that a token can be found and is accepted by GitLab
pub async fn run_auth_test(host: Option<&str>) -> Result<()> {
    println!("Testing GitLab authentication...");
    let config = get_gitlab_auth(host).await?;
    let user = test_gitlab_auth(&config).await?;
    println!("{} Authenticated as {}", check(), user.username.accent());
    println!("  Token source: {:?}", config.source);
    println!("  Host: {}", config.host);
    Ok(())
}

/// Print setup instructions
pub fn run_auth_setup() {
    println!("{}", "GitLab Authentication Setup".emphasis());
    println!();
    println!("Option 1: GitLab CLI (glab)");
    println!("  Install: https://gitlab.com/gitlab-org/cli");
    println!("  Run: glab auth login");
    println!();
    println!("Option 2: Environment variable");
    println!("  Set GITLAB_TOKEN or GL_TOKEN");
    println!();
    println!("For self-hosted GitLab:");
    println!("  Set GITLAB_HOST to your instance hostname");
}
