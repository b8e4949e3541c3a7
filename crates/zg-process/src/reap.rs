//! Exit-status collection (reaping).

use zg_common::{ChildExit, ProcessId, ProcessResult};

/// Block until `pid` terminates and collect its exit status.
///
/// `pid` must be a child of the caller. Once this returns the zombie entry is
/// gone from the process table.
#[cfg(unix)]
pub fn collect_exit_status(pid: ProcessId) -> ProcessResult<ChildExit> {
    use nix::errno::Errno;
    use nix::sys::wait::waitpid;

    loop {
        match waitpid(nix::unistd::Pid::from(pid), None) {
            Ok(status) => return Ok(to_child_exit(pid, status)),
            Err(Errno::EINTR) => continue,
            Err(e) => {
                return Err(zg_common::ProcessError::reap_failed(
                    pid.to_string(),
                    e.to_string(),
                ))
            }
        }
    }
}

/// Collect the exit status of `pid` if it has already terminated.
///
/// Returns `Ok(None)` while the child is still running.
#[cfg(unix)]
pub fn try_collect_exit_status(pid: ProcessId) -> ProcessResult<Option<ChildExit>> {
    use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};

    match waitpid(nix::unistd::Pid::from(pid), Some(WaitPidFlag::WNOHANG)) {
        Ok(WaitStatus::StillAlive) => Ok(None),
        Ok(status) => Ok(Some(to_child_exit(pid, status))),
        Err(e) => Err(zg_common::ProcessError::reap_failed(
            pid.to_string(),
            e.to_string(),
        )),
    }
}

#[cfg(unix)]
fn to_child_exit(pid: ProcessId, status: nix::sys::wait::WaitStatus) -> ChildExit {
    use nix::sys::wait::WaitStatus;
    use zg_common::ExitStatusKind;

    let status = match status {
        WaitStatus::Exited(_, code) => ExitStatusKind::Exited(code),
        WaitStatus::Signaled(_, signal, _) => ExitStatusKind::Signaled(signal.as_str().to_string()),
        other => ExitStatusKind::Other(format!("{:?}", other)),
    };

    ChildExit { pid, status }
}
