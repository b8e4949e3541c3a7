//! # ZG Generator
//!
//! Creates exactly one zombie process and keeps it observable.
//!
//! A run forks once. The child exits immediately; the parent holds the
//! child's exit status uncollected for an [`ObservationWindow`], then exits
//! (or reaps first, if configured) and the zombie passes to an ancestor.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use zg_generator::{GeneratorConfig, ZombieGenerator};
//!
//! # async fn demo() -> zg_common::Result<()> {
//! let config = GeneratorConfig {
//!     window: Duration::from_secs(5),
//!     ..Default::default()
//! };
//! let report = ZombieGenerator::new(config).run().await?;
//! println!("child {} was a zombie for {:?}", report.child, report.window_elapsed);
//! # Ok(())
//! # }
//! ```

pub mod config;
#[cfg(unix)]
pub mod generator;
pub mod handoff;
pub mod window;

pub use config::{parse_duration, GeneratorConfig, DEFAULT_WINDOW};
#[cfg(unix)]
pub use generator::{GeneratorReport, ZombieGenerator};
pub use window::{ObservationWindow, ReleaseReason};
