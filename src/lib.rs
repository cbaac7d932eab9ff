//! mr-stack - Stacked merge requests for git
//!
//! This library maintains a *stack* of dependent local git branches, each bound
//! to a GitLab merge request whose target is the previous branch in the stack.
//! It can reorder the stack and keep local branches and remote merge request
//! targets consistent afterwards.
//!
//! # Architecture
//!
//! - [`stack`]: the linked stack model, reordering and persistence
//! - [`git`]: the injectable git runner and status classification
//! - [`platform`]: merge request operations against GitLab
//! - [`sync`]: the retargeting and synchronization engines
//!
//! All collaborators (git, GitLab, storage, progress output) are passed in
//! explicitly as trait objects, so the engines are testable with mocks.

pub mod auth;
pub mod error;
pub mod git;
pub mod platform;
pub mod stack;
pub mod sync;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
