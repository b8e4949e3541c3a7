//! Process duplication.
//!
//! `fork(2)` returns twice. Here that becomes a single call returning a
//! [`ForkOutcome`], and each caller matches on it to pick its branch.

use zg_common::{ProcessId, ProcessResult};

/// Which side of the duplication the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForkOutcome {
    /// Running in the new process.
    Child,
    /// Running in the original process; `child` is the new process.
    Parent { child: ProcessId },
}

/// Seam over the OS duplication primitive.
///
/// The child branch must do nothing but call [`ProcessDuplicator::exit_child`].
/// After a fork only async-signal-safe calls are allowed in the child of a
/// multi-threaded parent, and `_exit` is one of them.
pub trait ProcessDuplicator {
    /// Create exactly one new process.
    fn fork(&self) -> ProcessResult<ForkOutcome>;

    /// Terminate the calling (child) process without running destructors,
    /// atexit handlers or flushing stdio.
    fn exit_child(&self, code: i32) -> !;
}

/// Production duplicator backed by `fork(2)` and `_exit(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForkDuplicator;

#[cfg(unix)]
impl ProcessDuplicator for ForkDuplicator {
    fn fork(&self) -> ProcessResult<ForkOutcome> {
        fork_process()
    }

    fn exit_child(&self, code: i32) -> ! {
        exit_child_immediately(code)
    }
}

/// Fork the calling process.
///
/// Any errno from `fork(2)` (`EAGAIN` when the process limit is hit,
/// `ENOMEM`, ...) becomes [`ProcessError::ProcessCreationFailed`].
///
/// [`ProcessError::ProcessCreationFailed`]: zg_common::ProcessError::ProcessCreationFailed
#[cfg(unix)]
pub fn fork_process() -> ProcessResult<ForkOutcome> {
    use nix::unistd::{fork, ForkResult};

    // SAFETY: callers only ever `_exit` in the child branch (see
    // `ProcessDuplicator`), so no lock or allocator state copied from other
    // threads is touched in the child.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => Ok(ForkOutcome::Parent { child: child.into() }),
        Ok(ForkResult::Child) => Ok(ForkOutcome::Child),
        Err(errno) => Err(zg_common::ProcessError::process_creation_failed(format!(
            "fork failed: {}",
            errno
        ))),
    }
}

/// Leave the current process immediately with `code`.
#[cfg(unix)]
pub fn exit_child_immediately(code: i32) -> ! {
    // SAFETY: `_exit(2)` is async-signal-safe and never returns.
    unsafe { nix::libc::_exit(code) }
}
