use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use zg_generator::{parse_duration, GeneratorConfig, ZombieGenerator};

/// Zombie generator - forks a child that exits immediately and leaves it
/// unreaped for an observation window
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (YAML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Observation window, e.g. 500ms, 60s, 2m [default: 60s]
    #[arg(long, value_name = "DURATION", value_parser = parse_duration)]
    window: Option<Duration>,

    /// End the window early once this file exists
    #[arg(long, value_name = "PATH")]
    release_file: Option<PathBuf>,

    /// Exit code used by the child [default: 0]
    #[arg(long, value_name = "CODE")]
    child_exit_code: Option<i32>,

    /// Collect the child's exit status after the window instead of leaving it to an ancestor
    #[arg(long)]
    reap_on_exit: bool,

    /// Poll the process table until the zombie is visible before starting the window
    #[arg(long)]
    verify_zombie: bool,

    /// Write the generator's own PID to this file
    #[arg(long, value_name = "PATH")]
    pid_file: Option<PathBuf>,

    /// Write the child's PID to this file once it is a zombie
    #[arg(long, value_name = "PATH")]
    ready_file: Option<PathBuf>,

    /// Enable info logging (stderr)
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging (stderr)
    #[arg(short, long)]
    debug: bool,
}

// Single-threaded runtime: the fork must happen while this is the only thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.verbose, args.debug)?;

    let config = build_config(&args)?;
    info!("Starting zombie generator (window {:?})", config.window);

    // The generator logs the failure itself; anyhow reports the chain on exit.
    let report = ZombieGenerator::new(config).run().await.context("Run failed")?;

    for transition in &report.child_transitions {
        debug!(
            child = %report.child,
            "{} -> {} ({})",
            transition.from_state,
            transition.to_state,
            transition.reason.as_deref().unwrap_or("no reason")
        );
    }
    if report.child_state.is_zombie() {
        info!(child = %report.child, "Leaving child for an ancestor to reap");
    }
    info!(
        parent = %report.parent,
        child = %report.child,
        "Zombie generator finished: {} after {:?}, child {}",
        report.released_by,
        report.window_elapsed,
        report.child_state
    );
    Ok(())
}

/// Defaults, then the YAML file, then command-line flags.
fn build_config(args: &Args) -> Result<GeneratorConfig> {
    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load_from_file(path)?,
        None => GeneratorConfig::default(),
    };

    if let Some(window) = args.window {
        config.window = window;
    }
    if let Some(path) = &args.release_file {
        config.release_file = Some(path.clone());
    }
    if let Some(code) = args.child_exit_code {
        config.child_exit_code = code;
    }
    if args.reap_on_exit {
        config.reap_on_exit = true;
    }
    if args.verify_zombie {
        config.verify_zombie = true;
    }
    if let Some(path) = &args.pid_file {
        config.pid_file = Some(path.clone());
    }
    if let Some(path) = &args.ready_file {
        config.ready_file = Some(path.clone());
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn initialize_logging(verbose: bool, debug: bool) -> Result<()> {
    // Silent by default: the fixture produces no output unless asked to.
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
