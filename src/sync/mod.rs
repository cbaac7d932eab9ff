//! Stack synchronization engines
//!
//! - [`update_mr_targets`]: retarget MRs after the stack was reordered
//! - [`sync_stack`]: reconcile local branches, remote branches and MRs

mod execute;
mod progress;
mod retarget;

pub use execute::{SyncEnv, SyncOptions, SyncResult, sync_stack};
pub use progress::{NoopProgress, Phase, ProgressCallback, PushStatus};
pub use retarget::{TargetChange, plan_target_changes, update_mr_targets};
