//! Benchmark Execution Module
//!
//! Runs the subject command under measurement and drives the full
//! benchmark matrix.
//!
//! # Architecture
//!
//! - [`driver`]: Sequential suite loop and per-run orchestration
//! - [`subject`]: Invocation of the program under measurement

pub mod driver;
pub mod subject;

pub use driver::{BenchmarkDriver, ResultsLayout, RunOutcome, SuiteReport};
pub use subject::{build_subject_command, run_subject};
