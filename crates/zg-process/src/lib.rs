//! # ZG Process
//!
//! Low-level process operations used by the zombie generator and its tests.
//!
//! This crate provides:
//! - Process duplication expressed as a tagged [`ForkOutcome`]
//! - Exit-status collection (reaping)
//! - Process existence checks
//! - Process-table inspection (state and parent of a pid)

pub mod check;
pub mod fork;
pub mod inspect;
pub mod reap;

// Re-export main types
#[cfg(unix)]
pub use check::process_exists;
pub use fork::{ForkDuplicator, ForkOutcome, ProcessDuplicator};
#[cfg(unix)]
pub use fork::{exit_child_immediately, fork_process};
pub use inspect::{ProcessInspector, ProcessTableEntry, SysinfoInspector, TableStatus};
#[cfg(unix)]
pub use reap::{collect_exit_status, try_collect_exit_status};
