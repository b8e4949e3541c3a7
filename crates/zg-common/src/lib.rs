//! # ZG Common
//!
//! Common types and errors shared across the zombie generator crates.

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::{Error, ProcessError, ProcessResult, Result, ResultExt};
pub use types::{ChildExit, ExitStatusKind, ProcessId};
