//! Git access
//!
//! All git interaction goes through the [`GitRunner`] trait so engines never
//! spawn processes themselves. [`SystemGit`] is the process-backed runner.

mod runner;
mod status;

pub use runner::SystemGit;
pub use status::{SyncState, parse_default_branch};

use crate::error::Result;

/// Executes git with an argument vector and returns its standard output
pub trait GitRunner: Send + Sync {
    /// Run `git <args>`; a nonzero exit becomes [`crate::Error::Git`]
    fn git(&self, args: &[&str]) -> Result<String>;
}
