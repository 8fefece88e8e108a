//! Benchmark Suite Definition Module
//!
//! Provides the data structures and configuration describing a benchmark
//! suite.
//!
//! # Structure
//!
//! - [`model`]: Targets and run records
//! - [`config`]: Run parameters and YAML loading

pub mod config;
pub mod model;

pub use config::{load_config, parse_config, BenchConfig, SamplerConfig, SubjectConfig};
pub use model::{
    current_timestamp, ResourceSummary, RunRecord, WorkflowTarget, DEFAULT_TARGETS,
    TIMESTAMP_FORMAT,
};
