//! Process-table assertions for E2E tests

use std::thread;
use std::time::{Duration, Instant};
use zg_common::ProcessId;
use zg_process::{ProcessInspector, ProcessTableEntry};

use crate::generator_process::GeneratorProcess;
use crate::log_parser::LogParser;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Poll until `parent` has a zombie child; fail if it has more than one
pub fn wait_for_single_zombie_child<I: ProcessInspector>(
    inspector: &mut I,
    parent: ProcessId,
    timeout: Duration,
) -> Result<ProcessTableEntry, String> {
    let deadline = Instant::now() + timeout;
    loop {
        let zombies = inspector
            .zombie_children_of(parent)
            .map_err(|e| format!("Inspection failed: {}", e))?;

        match zombies.len() {
            0 => {}
            1 => return Ok(zombies.into_iter().next().unwrap()),
            n => return Err(format!("Expected one zombie child of {}, found {}: {:?}", parent, n, zombies)),
        }

        if Instant::now() >= deadline {
            return Err(format!("No zombie child of {} appeared within {:?}", parent, timeout));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Assert that `parent` has exactly one child of any state
pub fn assert_single_child<I: ProcessInspector>(
    inspector: &mut I,
    parent: ProcessId,
) -> Result<ProcessTableEntry, String> {
    let children = inspector
        .children_of(parent)
        .map_err(|e| format!("Inspection failed: {}", e))?;

    if children.len() == 1 {
        Ok(children.into_iter().next().unwrap())
    } else {
        Err(format!("Expected exactly one child of {}, found {:?}", parent, children))
    }
}

/// Assert that `child` is no longer attributed to `former_parent`
///
/// Passes when the entry is gone or has been re-parented.
pub fn assert_not_attributed_to<I: ProcessInspector>(
    inspector: &mut I,
    child: ProcessId,
    former_parent: ProcessId,
) -> Result<Option<ProcessTableEntry>, String> {
    let entry = inspector
        .entry(child)
        .map_err(|e| format!("Inspection failed: {}", e))?;

    match entry {
        Some(e) if e.parent == Some(former_parent) => Err(format!(
            "Process {} is still attributed to {}: {:?}",
            child, former_parent, e
        )),
        other => Ok(other),
    }
}

/// Assert that the generator logged the given message
pub fn assert_logged(generator: &GeneratorProcess, pattern: &str) -> Result<(), String> {
    let parser = LogParser::new(generator.get_logs().to_vec());
    if parser.contains(pattern) {
        Ok(())
    } else {
        parser.print_all();
        Err(format!("Expected log line containing '{}'", pattern))
    }
}

/// Assert that the generator produced no output at all
pub fn assert_silent(generator: &GeneratorProcess) -> Result<(), String> {
    let parser = LogParser::new(generator.get_logs().to_vec());
    if parser.is_empty() {
        Ok(())
    } else {
        parser.print_all();
        Err("Expected the generator to produce no output".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zg_common::ProcessResult;
    use zg_process::TableStatus;

    struct FixedTable(Vec<ProcessTableEntry>);

    impl ProcessInspector for FixedTable {
        fn entry(&mut self, pid: ProcessId) -> ProcessResult<Option<ProcessTableEntry>> {
            Ok(self.0.iter().find(|e| e.pid == pid).cloned())
        }

        fn children_of(&mut self, parent: ProcessId) -> ProcessResult<Vec<ProcessTableEntry>> {
            Ok(self.0.iter().filter(|e| e.parent == Some(parent)).cloned().collect())
        }
    }

    fn row(pid: u32, parent: u32, status: TableStatus) -> ProcessTableEntry {
        ProcessTableEntry {
            pid: ProcessId::new(pid),
            parent: Some(ProcessId::new(parent)),
            status,
        }
    }

    #[test]
    fn test_single_zombie_found() {
        let mut table = FixedTable(vec![row(11, 10, TableStatus::Zombie)]);
        let entry = wait_for_single_zombie_child(&mut table, ProcessId::new(10), Duration::from_millis(50)).unwrap();
        assert_eq!(entry.pid, ProcessId::new(11));
        assert!(assert_single_child(&mut table, ProcessId::new(10)).is_ok());
    }

    #[test]
    fn test_fan_out_detected() {
        let mut table = FixedTable(vec![
            row(11, 10, TableStatus::Zombie),
            row(12, 10, TableStatus::Zombie),
        ]);
        assert!(wait_for_single_zombie_child(&mut table, ProcessId::new(10), Duration::from_millis(50)).is_err());
        assert!(assert_single_child(&mut table, ProcessId::new(10)).is_err());
    }

    #[test]
    fn test_missing_zombie_times_out() {
        let mut table = FixedTable(vec![row(11, 10, TableStatus::Sleeping)]);
        let err = wait_for_single_zombie_child(&mut table, ProcessId::new(10), Duration::from_millis(30)).unwrap_err();
        assert!(err.contains("No zombie child"));
    }

    #[test]
    fn test_reparented_or_gone() {
        let mut table = FixedTable(vec![row(11, 1, TableStatus::Zombie), row(12, 10, TableStatus::Zombie)]);
        let former = ProcessId::new(10);

        assert!(assert_not_attributed_to(&mut table, ProcessId::new(11), former).unwrap().is_some());
        assert!(assert_not_attributed_to(&mut table, ProcessId::new(99), former).unwrap().is_none());
        assert!(assert_not_attributed_to(&mut table, ProcessId::new(12), former).is_err());
    }
}
