//! Error Types
//!
//! Failures are split by how far they reach:
//!
//! - [`SetupError`]: aborts the whole suite before any run starts
//! - [`RunError`]: skips a single run, the suite carries on
//! - [`SamplerParseError`]: why a sampler output file could not be summarised
//! - [`SinkError`]: a result row could not be persisted

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while preparing the suite.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("failed to read config file '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create results file '{}': {source}", path.display())]
    CreateSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write results header: {0}")]
    WriteHeader(#[source] SinkError),
}

/// Errors that abort one run without stopping the suite.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start sampler '{program}': {source}")]
    SamplerLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to launch subject command '{program}': {source}")]
    SubjectLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("subject command failed with exit code {}", describe_exit_code(*code))]
    SubjectFailed { code: Option<i32> },

    #[error("failed to parse sampler output '{}': {source}", path.display())]
    SamplerOutput {
        path: PathBuf,
        #[source]
        source: SamplerParseError,
    },
}

fn describe_exit_code(code: Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (killed by signal)".to_string(),
    }
}

/// Errors from reading a sampler output file.
#[derive(Debug, Error)]
pub enum SamplerParseError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error("no data found in sampler output")]
    NoData,
}

/// Errors from writing to the results sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
