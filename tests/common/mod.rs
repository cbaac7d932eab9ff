//! Shared test utilities
//!
//! These are test utilities - not every test binary uses all of them.

#![allow(dead_code)]

pub mod fixtures;
pub mod memory_store;
pub mod mock_git;
pub mod mock_platform;

pub use fixtures::*;
pub use memory_store::MemoryStackStore;
pub use mock_git::MockGitRunner;
pub use mock_platform::MockMergeRequestService;
