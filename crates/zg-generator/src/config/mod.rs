use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::window::ObservationWindow;

pub mod validation;

/// How long the parent keeps the zombie unreaped unless told otherwise.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Generator configuration.
///
/// Every field has a default, so an empty YAML document (or no file at all)
/// gives the reference behaviour: a 60 second window, child exit code 0, no
/// hand-off files and no reaping by the parent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Observation window, e.g. `500ms`, `60s`, `2m`
    #[serde(with = "duration_serde")]
    pub window: Duration,

    /// End the window early once this file exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_file: Option<PathBuf>,

    /// Exit code used by the child
    pub child_exit_code: i32,

    /// Parent collects the child's exit status after the window
    pub reap_on_exit: bool,

    /// Poll the process table until the zombie is visible before the window starts
    pub verify_zombie: bool,

    /// Parent writes its own pid here
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid_file: Option<PathBuf>,

    /// Parent writes the child's pid here once the zombie exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ready_file: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            release_file: None,
            child_exit_code: 0,
            reap_on_exit: false,
            verify_zombie: false,
            pid_file: None,
            ready_file: None,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::load_from_string(&content)
    }

    /// Load configuration from a YAML string
    pub fn load_from_string(content: &str) -> Result<Self> {
        // serde_yaml rejects an empty document; treat it as "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: GeneratorConfig = serde_yaml::from_str(content)
            .context("Failed to parse YAML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// The window the parent waits out before exiting
    pub fn observation_window(&self) -> ObservationWindow {
        let window = ObservationWindow::new(self.window);
        match &self.release_file {
            Some(path) => window.with_release_file(path.clone()),
            None => window,
        }
    }
}

/// Parse `"<n>ms"`, `"<n>s"` or `"<n>m"` into a Duration.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    // Check for "ms" BEFORE "s" since "ms" ends with 's'
    if let Some(num_str) = s.strip_suffix("ms") {
        let millis: u64 = num_str.parse().map_err(|_| format!("Invalid duration: {}", s))?;
        Ok(Duration::from_millis(millis))
    } else if let Some(num_str) = s.strip_suffix('s') {
        let secs: u64 = num_str.parse().map_err(|_| format!("Invalid duration: {}", s))?;
        Ok(Duration::from_secs(secs))
    } else if let Some(num_str) = s.strip_suffix('m') {
        let mins: u64 = num_str.parse().map_err(|_| format!("Invalid duration: {}", s))?;
        let secs = mins.checked_mul(60).ok_or_else(|| format!("Invalid duration: {}", s))?;
        Ok(Duration::from_secs(secs))
    } else {
        Err(format!("Duration must end with 's', 'ms', or 'm': {}", s))
    }
}

/// Inverse of [`parse_duration`]; keeps millisecond precision.
pub fn format_duration(duration: &Duration) -> String {
    if duration.subsec_millis() == 0 {
        format!("{}s", duration.as_secs())
    } else {
        format!("{}ms", duration.as_millis())
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_duration(duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_duration(&s).map_err(serde::de::Error::custom)
    }
}
