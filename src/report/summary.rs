//! Suite Summary
//!
//! JSON record of a finished suite, written next to the results CSV:
//! when it ran, on which host, how many runs succeeded and why the others
//! were skipped.

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::monitoring::HostInfo;

/// File name of the summary inside the results directory.
pub const SUMMARY_FILE_NAME: &str = "suite_summary.json";

/// A run that produced no record.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FailedRun {
    pub workflow_name: String,
    pub run_number: u32,
    pub error: String,
}

/// End-of-suite report persisted as JSON.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SuiteSummary {
    pub started_at: String,
    pub finished_at: String,
    pub host: HostInfo,
    pub sampling_enabled: bool,
    pub planned_runs: usize,
    pub completed_runs: usize,
    pub failed_runs: Vec<FailedRun>,
    pub results_file: PathBuf,
}

impl SuiteSummary {
    /// Saves the summary as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Box<dyn Error>> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        info!("Saved suite summary to {}", path.display());
        Ok(())
    }

    #[cfg(test)]
    fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
