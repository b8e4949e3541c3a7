//! Files the parent leaves for a harness: its own pid and the child's pid.
//!
//! Both are optional and removed again (best-effort) when the generator
//! finishes, so a default run leaves nothing behind.

use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{info, warn};
use zg_common::{ProcessId, Result, ResultExt};

/// Owns the hand-off files written during a run and removes them on drop.
#[derive(Debug, Default)]
pub struct HandOffFiles {
    written: Vec<PathBuf>,
}

impl HandOffFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `pid` to `path` atomically and remember it for cleanup.
    pub fn write_pid(&mut self, path: &Path, pid: ProcessId) -> Result<()> {
        atomic_write_text(path, &format!("{}\n", pid))
            .map_err(zg_common::Error::from)
            .context(format!("Failed to write {}", path.display()))?;
        info!("Wrote pid {} to {}", pid, path.display());
        self.written.push(path.to_path_buf());
        Ok(())
    }
}

impl Drop for HandOffFiles {
    fn drop(&mut self) {
        for path in &self.written {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to remove {}: {}", path.display(), e);
                }
            }
        }
    }
}

/// Write `contents` via a temp file and rename, so readers never see a
/// partially written file.
pub fn atomic_write_text(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "handoff".to_string());

    let tmp_path = path.with_file_name(format!("{file_name}.tmp-{pid}-{nanos}"));

    std::fs::write(&tmp_path, contents)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
