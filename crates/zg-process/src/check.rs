//! Process existence checking.

use zg_common::{ProcessId, ProcessResult};

/// Check if a process with the given PID has an entry in the process table.
///
/// On Unix this uses `kill(pid, 0)`, which sends no signal. A zombie still
/// counts as existing: its entry stays until it is reaped.
///
/// # Returns
///
/// * `Ok(true)` - Process exists (running or zombie)
/// * `Ok(false)` - Process does not exist
/// * `Err(_)` - Error occurred while checking
///
/// # Examples
///
/// ```rust,no_run
/// use zg_common::ProcessId;
/// use zg_process::process_exists;
///
/// if process_exists(ProcessId::new(1234)).unwrap() {
///     println!("Process 1234 is still in the process table");
/// }
/// ```
#[cfg(unix)]
pub fn process_exists(pid: ProcessId) -> ProcessResult<bool> {
    use nix::sys::signal::kill;

    match kill(nix::unistd::Pid::from(pid), None) {
        Ok(_) => Ok(true),
        Err(nix::errno::Errno::ESRCH) => Ok(false),
        // Exists, but belongs to someone else
        Err(nix::errno::Errno::EPERM) => Ok(true),
        Err(e) => Err(zg_common::ProcessError::inspection(
            pid.to_string(),
            format!("Failed to check process: {}", e),
        )),
    }
}
