use super::*;
use anyhow::{anyhow, Result};

/// Upper bound on the observation window; anything longer is almost
/// certainly a unit mistake.
pub const MAX_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Validate the complete configuration
pub fn validate_config(config: &GeneratorConfig) -> Result<()> {
    validate_window(config.window)?;
    validate_exit_code(config.child_exit_code)?;
    validate_files(config)?;
    Ok(())
}

fn validate_window(window: Duration) -> Result<()> {
    if window.is_zero() {
        return Err(anyhow!("Observation window must be greater than 0"));
    }

    if window > MAX_WINDOW {
        return Err(anyhow!(
            "Observation window too long (max {}): {}",
            format_duration(&MAX_WINDOW),
            format_duration(&window)
        ));
    }

    Ok(())
}

fn validate_exit_code(code: i32) -> Result<()> {
    // Only the low byte survives wait(2).
    if !(0..=255).contains(&code) {
        return Err(anyhow!("Child exit code must be between 0 and 255, got: {}", code));
    }
    Ok(())
}

fn validate_files(config: &GeneratorConfig) -> Result<()> {
    let files: Vec<(&str, &PathBuf)> = [
        ("release_file", config.release_file.as_ref()),
        ("pid_file", config.pid_file.as_ref()),
        ("ready_file", config.ready_file.as_ref()),
    ]
    .into_iter()
    .filter_map(|(name, path)| path.map(|p| (name, p)))
    .collect();

    for (name, path) in &files {
        if path.as_os_str().is_empty() {
            return Err(anyhow!("{} cannot be empty", name));
        }
    }

    for (i, (name_a, path_a)) in files.iter().enumerate() {
        for (name_b, path_b) in &files[i + 1..] {
            if path_a == path_b {
                return Err(anyhow!(
                    "{} and {} must be different files: {}",
                    name_a,
                    name_b,
                    path_a.display()
                ));
            }
        }
    }

    Ok(())
}
