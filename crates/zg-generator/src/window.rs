//! The observation window: how long the parent stays alive without reaping.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

const RELEASE_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// What ended the observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseReason {
    /// The full window elapsed.
    WindowElapsed,
    /// The release file appeared before the window elapsed.
    ReleaseFile,
}

impl fmt::Display for ReleaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseReason::WindowElapsed => write!(f, "window elapsed"),
            ReleaseReason::ReleaseFile => write!(f, "release file"),
        }
    }
}

/// A bounded wait.
///
/// Without a release file this is a plain timed sleep with no way to cut it
/// short. With one, the wait also ends as soon as the file exists, which lets
/// a harness finish its observation deterministically instead of racing the
/// clock. `duration` stays the upper bound either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationWindow {
    duration: Duration,
    release_file: Option<PathBuf>,
}

impl ObservationWindow {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            release_file: None,
        }
    }

    pub fn with_release_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.release_file = Some(path.into());
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn release_file(&self) -> Option<&Path> {
        self.release_file.as_deref()
    }

    /// Suspend until the window ends.
    pub async fn wait(&self) -> ReleaseReason {
        match &self.release_file {
            None => {
                debug!("Observation window: sleeping {:?}", self.duration);
                sleep(self.duration).await;
                ReleaseReason::WindowElapsed
            }
            Some(path) => {
                debug!(
                    "Observation window: up to {:?} or until {} exists",
                    self.duration,
                    path.display()
                );
                tokio::select! {
                    _ = sleep(self.duration) => ReleaseReason::WindowElapsed,
                    _ = wait_for_file_exists(path) => {
                        info!("Release file found: {}", path.display());
                        ReleaseReason::ReleaseFile
                    }
                }
            }
        }
    }
}

async fn wait_for_file_exists(path: &Path) {
    while tokio::fs::metadata(path).await.is_err() {
        sleep(RELEASE_POLL_INTERVAL).await;
    }
}
