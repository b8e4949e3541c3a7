//! # ZG Process State
//!
//! Lifecycle tracking for the generator's child process.
//!
//! A child moves strictly forward: `Running -> Terminated -> Reaped`.
//! `Terminated` is the zombie state: the process is gone but its exit
//! status is still held by the kernel. `Reaped` is only reached when
//! somebody collects that status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use zg_common::errors::{ProcessError, ProcessResult};

/// Lifecycle state of a tracked process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Process exists and has not exited yet
    Running,
    /// Process has exited but its status has not been collected (zombie)
    Terminated,
    /// Exit status collected, process-table entry released
    Reaped,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleState::Running => write!(f, "running"),
            LifecycleState::Terminated => write!(f, "terminated"),
            LifecycleState::Reaped => write!(f, "reaped"),
        }
    }
}

impl LifecycleState {
    /// The process occupies a zombie entry in the process table
    pub fn is_zombie(&self) -> bool {
        matches!(self, LifecycleState::Terminated)
    }
}

/// Represents a state transition with timestamp and optional reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    pub from_state: LifecycleState,
    pub to_state: LifecycleState,
    pub timestamp: DateTime<Utc>,
    pub reason: Option<String>,
}

/// Forward-only state machine for one process
#[derive(Debug, Clone)]
pub struct LifecycleStateMachine {
    process_id: String,
    current_state: LifecycleState,
    state_history: Vec<StateTransition>,
}

impl LifecycleStateMachine {
    /// Create a state machine for a freshly created process
    pub fn new(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            current_state: LifecycleState::Running,
            state_history: Vec::new(),
        }
    }

    pub fn current_state(&self) -> LifecycleState {
        self.current_state
    }

    pub fn state_history(&self) -> &[StateTransition] {
        &self.state_history
    }

    /// Check if a transition from current state to target state is valid
    pub fn is_valid_transition(&self, target_state: LifecycleState) -> bool {
        matches!(
            (self.current_state, target_state),
            (LifecycleState::Running, LifecycleState::Terminated)
                | (LifecycleState::Terminated, LifecycleState::Reaped)
        )
    }

    /// Transition to a new state with optional reason
    pub fn transition_to(&mut self, target_state: LifecycleState, reason: Option<String>) -> ProcessResult<()> {
        if !self.is_valid_transition(target_state) {
            return Err(ProcessError::invalid_state(
                &self.process_id,
                expected_predecessor(target_state),
                self.current_state.to_string(),
            ));
        }

        let now = Utc::now();
        let from_state = self.current_state;
        self.state_history.push(StateTransition {
            from_state,
            to_state: target_state,
            timestamp: now,
            reason,
        });
        self.current_state = target_state;

        tracing::debug!(
            "Process {} transitioned from {} to {}",
            self.process_id,
            from_state,
            target_state
        );

        Ok(())
    }

    pub fn transition_to_terminated(&mut self, reason: impl Into<String>) -> ProcessResult<()> {
        self.transition_to(LifecycleState::Terminated, Some(reason.into()))
    }

    pub fn transition_to_reaped(&mut self, reason: impl Into<String>) -> ProcessResult<()> {
        self.transition_to(LifecycleState::Reaped, Some(reason.into()))
    }
}

fn expected_predecessor(target: LifecycleState) -> &'static str {
    match target {
        LifecycleState::Running => "nothing (initial state)",
        LifecycleState::Terminated => "running",
        LifecycleState::Reaped => "terminated",
    }
}
