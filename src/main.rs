//! mrs - Stacked merge requests for GitLab
//!
//! CLI binary for keeping a chain of dependent git branches and their MRs in
//! order.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "mrs")]
#[command(about = "Stacked merge requests for GitLab")]
#[command(version)]
struct Cli {
    /// Path to git repository (defaults to current directory)
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Stack to operate on (defaults to the current stack)
    #[arg(short, long, global = true)]
    stack: Option<String>,

    /// Log git commands and API calls
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty stack and make it current
    Create {
        /// Stack title
        title: String,

        /// Branch the first MR targets (defaults to the remote's default branch)
        #[arg(long)]
        base_branch: Option<String>,
    },

    /// Append a branch to the end of the stack
    Track {
        /// Branch to track
        branch: String,

        /// MR description; first line becomes the title (defaults to the commit message)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Show the stack from head to tail
    Show,

    /// List all stacks
    List,

    /// Make another stack current
    Switch {
        /// Stack title
        title: String,
    },

    /// Forget a stack (branches and MRs are kept)
    Delete {
        /// Stack title
        title: String,
    },

    /// Reorder the stack and retarget its MRs
    Reorder {
        /// New branch order, head first (opens $EDITOR when omitted)
        branches: Vec<String>,

        /// Dry run - show which MRs would be retargeted
        #[arg(long)]
        dry_run: bool,

        /// Git remote of the GitLab project
        #[arg(long, default_value = "origin")]
        remote: String,
    },

    /// Sync branches with the remote and create missing MRs
    Sync {
        /// Branch the first MR targets; saved for later syncs
        #[arg(long)]
        base_branch: Option<String>,

        /// Git remote to sync with
        #[arg(long, default_value = "origin")]
        remote: String,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication
    Test {
        /// GitLab host (defaults to GITLAB_HOST or gitlab.com)
        #[arg(long)]
        host: Option<String>,
    },
    /// Show authentication setup instructions
    Setup,
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let path = cli.path.unwrap_or_else(|| PathBuf::from("."));
    let stack = cli.stack.as_deref();

    match cli.command {
        Commands::Create { title, base_branch } => {
            cli::run_create(&path, &title, base_branch.as_deref())?;
        }
        Commands::Track {
            branch,
            description,
        } => {
            cli::run_track(&path, stack, &branch, description.as_deref())?;
        }
        Commands::Show => cli::run_show(&path, stack)?,
        Commands::List => cli::run_list(&path)?,
        Commands::Switch { title } => cli::run_switch(&path, &title)?,
        Commands::Delete { title } => cli::run_delete(&path, &title)?,
        Commands::Reorder {
            branches,
            dry_run,
            remote,
        } => {
            cli::run_reorder(&path, stack, branches, &remote, dry_run).await?;
        }
        Commands::Sync {
            base_branch,
            remote,
        } => {
            cli::run_sync(&path, stack, base_branch.as_deref(), &remote).await?;
        }
        Commands::Auth { action } => match action {
            AuthAction::Test { host } => cli::run_auth_test(host.as_deref()).await?,
            AuthAction::Setup => cli::run_auth_setup(),
        },
    }

    Ok(())
}
