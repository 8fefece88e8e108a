//! Argus Bench - Workflow Analysis Benchmarking Harness
//!
//! Repeatedly runs the Argus analyser against a fixed set of workflow
//! files, times each run, optionally samples system resources with dstat
//! while it runs, and appends one CSV row per completed run.
//!
//! # Architecture
//!
//! The library is organized into five modules:
//!
//! - [`suite`]: Targets, run records and configuration
//! - [`execution`]: Subject invocation and the sequential benchmark driver
//! - [`monitoring`]: Sampler process handling and sampler-output parsing
//! - [`report`]: Results CSV and end-of-suite summary
//! - [`error`]: Setup, per-run, parse and sink errors
//!
//! # Example
//!
//! ```rust,no_run
//! use argus_bench::execution::BenchmarkDriver;
//! use argus_bench::load_config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load run parameters from YAML
//!     let config = load_config("bench.yaml")?;
//!     let targets = config.effective_targets();
//!
//!     // Run every target `repetitions` times
//!     let driver = BenchmarkDriver::new(config);
//!     let report = driver.run(&targets)?;
//!
//!     println!("Results in {}", report.results_file.display());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod execution;
pub mod monitoring;
pub mod report;
pub mod suite;

// Re-export commonly used types
pub use error::{RunError, SamplerParseError, SetupError, SinkError};
pub use execution::driver::{BenchmarkDriver, SuiteReport};
pub use suite::config::{load_config, BenchConfig};
pub use suite::model::{ResourceSummary, RunRecord, WorkflowTarget};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "Argus Bench";
