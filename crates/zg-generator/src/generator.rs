//! The generator run: fork once, let the child die, keep it unreaped.

use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{error, info, warn};

use zg_common::{ChildExit, ProcessId, Result};
use zg_process::{
    collect_exit_status, ForkDuplicator, ForkOutcome, ProcessDuplicator, ProcessInspector,
    SysinfoInspector,
};
use zg_process_state::{LifecycleState, LifecycleStateMachine, StateTransition};

use crate::config::GeneratorConfig;
use crate::handoff::HandOffFiles;
use crate::window::ReleaseReason;

const VERIFY_TIMEOUT: Duration = Duration::from_secs(1);
const VERIFY_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Outcome of a completed run, as seen by the parent.
#[derive(Debug, Clone)]
pub struct GeneratorReport {
    pub parent: ProcessId,
    pub child: ProcessId,
    /// `Some(seen)` when zombie verification was enabled
    pub zombie_observed: Option<bool>,
    pub released_by: ReleaseReason,
    pub window_elapsed: Duration,
    /// Set when the parent collected the child's status itself
    pub reaped: Option<ChildExit>,
    /// Final lifecycle state of the child as tracked by the parent
    pub child_state: LifecycleState,
    pub child_transitions: Vec<StateTransition>,
}

/// Creates exactly one zombie per [`run`](ZombieGenerator::run).
pub struct ZombieGenerator<D = ForkDuplicator> {
    config: GeneratorConfig,
    duplicator: D,
}

impl ZombieGenerator<ForkDuplicator> {
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_duplicator(config, ForkDuplicator)
    }
}

impl<D: ProcessDuplicator> ZombieGenerator<D> {
    pub fn with_duplicator(config: GeneratorConfig, duplicator: D) -> Self {
        Self { config, duplicator }
    }

    /// Fork, then wait out the observation window in the parent.
    ///
    /// The child never returns from this call. Must run before the calling
    /// process has started any other threads; see [`ProcessDuplicator`].
    pub async fn run(&self) -> Result<GeneratorReport> {
        let parent = ProcessId::current();

        let child = match self.duplicator.fork() {
            Ok(ForkOutcome::Child) => self.duplicator.exit_child(self.config.child_exit_code),
            Ok(ForkOutcome::Parent { child }) => child,
            Err(e) => {
                error!(parent = %parent, "Failed to create child process: {}", e);
                return Err(e.into());
            }
        };
        info!(parent = %parent, child = %child, "Forked child process");

        let mut lifecycle = LifecycleStateMachine::new(format!("child-{}", child));
        let mut handoff = HandOffFiles::new();

        if let Some(path) = &self.config.pid_file {
            handoff.write_pid(path, parent)?;
        }

        let zombie_observed = if self.config.verify_zombie {
            let seen = wait_for_zombie(child, parent).await;
            if seen {
                info!(child = %child, "Child is visible as a zombie");
            } else {
                warn!(
                    child = %child,
                    "Child not observed as a zombie within {:?}", VERIFY_TIMEOUT
                );
            }
            Some(seen)
        } else {
            None
        };

        lifecycle.transition_to_terminated(match zombie_observed {
            Some(true) => "observed as zombie",
            _ => "child exits immediately after fork",
        })?;

        if let Some(path) = &self.config.ready_file {
            handoff.write_pid(path, child)?;
        }

        let window = self.config.observation_window();
        info!(
            child = %child,
            "Holding zombie for up to {:?} without reaping",
            window.duration()
        );
        let started = Instant::now();
        let released_by = window.wait().await;
        let window_elapsed = started.elapsed();
        info!(child = %child, "Observation window ended ({}) after {:?}", released_by, window_elapsed);

        let reaped = if self.config.reap_on_exit {
            let exit = collect_exit_status(child)?;
            lifecycle.transition_to_reaped(exit.status.to_string())?;
            info!(child = %child, "Reaped {}", exit);
            Some(exit)
        } else {
            None
        };

        Ok(GeneratorReport {
            parent,
            child,
            zombie_observed,
            released_by,
            window_elapsed,
            reaped,
            child_state: lifecycle.current_state(),
            child_transitions: lifecycle.state_history().to_vec(),
        })
    }
}

/// Poll the process table until `child` shows up as a zombie of `parent`.
async fn wait_for_zombie(child: ProcessId, parent: ProcessId) -> bool {
    let mut inspector = match SysinfoInspector::new() {
        Ok(inspector) => inspector,
        Err(e) => {
            warn!("Cannot verify zombie state: {}", e);
            return false;
        }
    };

    let deadline = Instant::now() + VERIFY_TIMEOUT;
    loop {
        match inspector.is_zombie_child_of(child, parent) {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => {
                warn!("Process table inspection failed: {}", e);
                return false;
            }
        }

        if Instant::now() >= deadline {
            return false;
        }
        sleep(VERIFY_POLL_INTERVAL).await;
    }
}
