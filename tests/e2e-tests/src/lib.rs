// E2E Test Framework for the zombie generator

pub mod assertions;
pub mod log_parser;

pub use generator_process::{wait_for_file, GeneratorOptions, GeneratorProcess};
pub use log_parser::LogParser;

use tempfile::TempDir;

/// Create a temporary test directory, removed when the guard drops
pub fn create_test_dir(test_name: &str) -> TempDir {
    let dir = tempfile::Builder::new()
        .prefix(&format!("zg-e2e-{}-", test_name))
        .tempdir()
        .expect("Failed to create test directory");
    println!("Test dir: {}", dir.path().display());
    dir
}

/// Make the calling test process inherit orphaned descendants.
///
/// Once the generator exits, its zombie child is re-parented to us instead
/// of init, so the test can collect the child's exit status itself.
/// Returns false where subreapers are not available.
pub fn become_subreaper() -> bool {
    #[cfg(target_os = "linux")]
    {
        match nix::sys::prctl::set_child_subreaper(true) {
            Ok(()) => true,
            Err(e) => {
                println!("Could not become a subreaper: {}", e);
                false
            }
        }
    }

    #[cfg(not(target_os = "linux"))]
    {
        false
    }
}

/// True when running with root privileges (process limits do not apply)
pub fn running_as_root() -> bool {
    #[cfg(unix)]
    {
        nix::unistd::geteuid().is_root()
    }

    #[cfg(not(unix))]
    {
        false
    }
}
