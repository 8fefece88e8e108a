//! Result Reporting Module
//!
//! - [`sink`]: Incremental results CSV
//! - [`summary`]: End-of-suite JSON summary

pub mod sink;
pub mod summary;

pub use sink::{format_row, ResultsSink, SAMPLING_HEADER, TIMING_HEADER};
pub use summary::{FailedRun, SuiteSummary, SUMMARY_FILE_NAME};
