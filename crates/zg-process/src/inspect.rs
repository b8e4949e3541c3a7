//! Process-table inspection.
//!
//! A harness observes the generator from the outside: it looks up rows of the
//! OS process table and checks their state and parent. [`SysinfoInspector`]
//! does this through `sysinfo`, which reads `/proc` on Linux.

use std::fmt;
use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, System};
use tracing::debug;
use zg_common::{ProcessError, ProcessId, ProcessResult};

/// Scheduling state of a process-table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableStatus {
    Running,
    Sleeping,
    /// Terminated, exit status not collected yet.
    Zombie,
    Dead,
    Other(String),
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableStatus::Running => write!(f, "running"),
            TableStatus::Sleeping => write!(f, "sleeping"),
            TableStatus::Zombie => write!(f, "zombie"),
            TableStatus::Dead => write!(f, "dead"),
            TableStatus::Other(s) => write!(f, "{}", s),
        }
    }
}

impl From<ProcessStatus> for TableStatus {
    fn from(status: ProcessStatus) -> Self {
        match status {
            ProcessStatus::Run => TableStatus::Running,
            ProcessStatus::Sleep | ProcessStatus::Idle | ProcessStatus::UninterruptibleDiskSleep => {
                TableStatus::Sleeping
            }
            ProcessStatus::Zombie => TableStatus::Zombie,
            ProcessStatus::Dead => TableStatus::Dead,
            other => TableStatus::Other(other.to_string()),
        }
    }
}

/// Snapshot of one process-table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTableEntry {
    pub pid: ProcessId,
    pub parent: Option<ProcessId>,
    pub status: TableStatus,
}

impl ProcessTableEntry {
    pub fn is_zombie(&self) -> bool {
        self.status == TableStatus::Zombie
    }
}

/// Read access to the OS process table.
pub trait ProcessInspector {
    /// Look up a single process. `Ok(None)` if it has no entry.
    fn entry(&mut self, pid: ProcessId) -> ProcessResult<Option<ProcessTableEntry>>;

    /// All processes whose parent is `parent`.
    fn children_of(&mut self, parent: ProcessId) -> ProcessResult<Vec<ProcessTableEntry>>;

    /// Children of `parent` currently in the zombie state.
    fn zombie_children_of(&mut self, parent: ProcessId) -> ProcessResult<Vec<ProcessTableEntry>> {
        Ok(self
            .children_of(parent)?
            .into_iter()
            .filter(ProcessTableEntry::is_zombie)
            .collect())
    }

    /// True if `child` is a zombie attributed to `parent`.
    fn is_zombie_child_of(&mut self, child: ProcessId, parent: ProcessId) -> ProcessResult<bool> {
        Ok(self
            .entry(child)?
            .map_or(false, |e| e.is_zombie() && e.parent == Some(parent)))
    }
}

/// [`ProcessInspector`] backed by `sysinfo`.
pub struct SysinfoInspector {
    system: System,
}

impl SysinfoInspector {
    /// Fails on platforms `sysinfo` cannot read a process table from.
    pub fn new() -> ProcessResult<Self> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(ProcessError::inspection(
                "process-table",
                format!("process inspection is not supported on {}", std::env::consts::OS),
            ));
        }
        Ok(Self { system: System::new() })
    }

    fn snapshot(pid: Pid, process: &sysinfo::Process) -> ProcessTableEntry {
        ProcessTableEntry {
            pid: ProcessId::new(pid.as_u32()),
            parent: process.parent().map(|p| ProcessId::new(p.as_u32())),
            status: process.status().into(),
        }
    }
}

impl ProcessInspector for SysinfoInspector {
    fn entry(&mut self, pid: ProcessId) -> ProcessResult<Option<ProcessTableEntry>> {
        let sysinfo_pid = Pid::from_u32(pid.as_u32());
        // Returns false (and drops the cached row) once the pid is gone.
        if !self
            .system
            .refresh_process_specifics(sysinfo_pid, ProcessRefreshKind::new())
        {
            debug!("Process {} has no process-table entry", pid);
            return Ok(None);
        }

        Ok(self
            .system
            .process(sysinfo_pid)
            .map(|process| Self::snapshot(sysinfo_pid, process)))
    }

    fn children_of(&mut self, parent: ProcessId) -> ProcessResult<Vec<ProcessTableEntry>> {
        self.system.refresh_processes_specifics(ProcessRefreshKind::new());

        let parent_pid = Pid::from_u32(parent.as_u32());
        let mut children: Vec<ProcessTableEntry> = self
            .system
            .processes()
            .iter()
            .filter(|(pid, process)| **pid != parent_pid && process.parent() == Some(parent_pid))
            .map(|(pid, process)| Self::snapshot(*pid, process))
            .collect();
        children.sort_by_key(|e| e.pid);

        debug!("Process {} has {} children", parent, children.len());
        Ok(children)
    }
}
