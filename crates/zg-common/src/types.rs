//! Core domain types shared by the zombie generator crates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Operating-system process identifier.
///
/// # Example
/// ```
/// use zg_common::ProcessId;
///
/// let pid = ProcessId::from(4242u32);
/// assert_eq!(pid.as_u32(), 4242);
/// assert_eq!(pid.to_string(), "4242");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProcessId(u32);

impl ProcessId {
    /// Creates a new ProcessId from a raw pid.
    pub fn new(pid: u32) -> Self {
        Self(pid)
    }

    /// Identifier of the calling process.
    pub fn current() -> Self {
        Self(std::process::id())
    }

    /// Returns the raw pid.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ProcessId {
    fn from(pid: u32) -> Self {
        Self(pid)
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(unix)]
impl From<nix::unistd::Pid> for ProcessId {
    fn from(pid: nix::unistd::Pid) -> Self {
        // Pids handed out by the kernel are always positive.
        Self(pid.as_raw() as u32)
    }
}

#[cfg(unix)]
impl From<ProcessId> for nix::unistd::Pid {
    fn from(pid: ProcessId) -> Self {
        nix::unistd::Pid::from_raw(pid.0 as i32)
    }
}

/// How a collected child terminated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitStatusKind {
    /// Normal exit with the given code.
    Exited(i32),
    /// Killed by a signal.
    Signaled(String),
    /// Anything else `waitpid` can report (stopped, continued, ...).
    Other(String),
}

impl ExitStatusKind {
    /// Exit code for a normal exit, `None` otherwise.
    pub fn code(&self) -> Option<i32> {
        match self {
            ExitStatusKind::Exited(code) => Some(*code),
            _ => None,
        }
    }

    pub fn success(&self) -> bool {
        self.code() == Some(0)
    }
}

impl fmt::Display for ExitStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitStatusKind::Exited(code) => write!(f, "exited with code {}", code),
            ExitStatusKind::Signaled(signal) => write!(f, "killed by {}", signal),
            ExitStatusKind::Other(what) => write!(f, "{}", what),
        }
    }
}

/// Exit status collected from a terminated child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildExit {
    pub pid: ProcessId,
    pub status: ExitStatusKind,
}

impl fmt::Display for ChildExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "child {} {}", self.pid, self.status)
    }
}
