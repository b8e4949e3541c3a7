//! Error types for the zombie generator.
//!
//! Two layers:
//! - [`ProcessError`]: failures of the OS process primitives (fork, waitpid,
//!   process-table lookups). Cheap to clone so it can be stored in reports.
//! - [`Error`]: everything a generator run can fail with, including I/O
//!   problems with the hand-off files. Configuration is checked by the
//!   config loader before a run starts.
//!
//! ```rust
//! use zg_common::{Error, ProcessError, Result};
//!
//! fn fork_like() -> Result<()> {
//!     Err(ProcessError::process_creation_failed("EAGAIN").into())
//! }
//!
//! let err = fork_like().unwrap_err();
//! assert!(matches!(err, Error::Process(ProcessError::ProcessCreationFailed { .. })));
//! ```

use thiserror::Error;

/// Result type alias for generator operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for generator operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A process primitive failed.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// I/O error (wraps std::io::Error).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context.
    #[error("{message}: {source}")]
    WithContext {
        message: String,
        source: Box<Error>,
    },
}

impl Error {
    /// Adds context to an error.
    ///
    /// # Example
    /// ```
    /// use zg_common::{Error, ProcessError};
    ///
    /// let err = Error::from(ProcessError::reap_failed("42", "ECHILD")).context("Reaping child");
    /// assert!(err.to_string().starts_with("Reaping child"));
    /// ```
    pub fn context(self, message: impl Into<String>) -> Self {
        Self::WithContext {
            message: message.into(),
            source: Box::new(self),
        }
    }
}

// Convenience methods for Result types
pub trait ResultExt<T> {
    /// Adds context to an error result.
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(message))
    }
}

// ==============================================================================
// Process Errors
// ==============================================================================

/// Failures of the low-level process primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessError {
    /// The duplication primitive could not create a new process.
    #[error("Process creation failed: {reason}")]
    ProcessCreationFailed { reason: String },

    #[error("Process reap failed: {id} - {reason}")]
    ReapFailed { id: String, reason: String },

    #[error("Process state error: {id} - expected {expected}, got {actual}")]
    InvalidState {
        id: String,
        expected: String,
        actual: String,
    },

    #[error("Process table inspection failed: {id} - {reason}")]
    Inspection { id: String, reason: String },
}

impl ProcessError {
    pub fn process_creation_failed(reason: impl Into<String>) -> Self {
        Self::ProcessCreationFailed {
            reason: reason.into(),
        }
    }

    pub fn reap_failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ReapFailed {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_state(
        id: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            id: id.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn inspection(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Inspection {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for process operations.
pub type ProcessResult<T> = std::result::Result<T, ProcessError>;
