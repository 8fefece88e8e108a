//! Benchmark Data Model
//!
//! Core data structures describing what is benchmarked and what each run
//! produces.
//!
//! # Example YAML Format
//!
//! ```yaml
//! targets:
//!   - name: vwbench_workflow1
//!     path: ../Argus_artifacts/VWBench/.github/workflows/1.yml
//!   - name: vwbench_workflow2
//!     path: ../Argus_artifacts/VWBench/.github/workflows/2.yml
//! ```

use chrono::Local;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Timestamp layout used for run records and raw sampler file names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Number of workflows in the VWBench corpus.
const VWBENCH_WORKFLOW_COUNT: usize = 24;

/// Built-in target catalogue, used when the configuration lists no targets.
pub static DEFAULT_TARGETS: Lazy<Vec<WorkflowTarget>> = Lazy::new(|| {
    (1..=VWBENCH_WORKFLOW_COUNT)
        .map(|n| {
            WorkflowTarget::new(
                format!("../Argus_artifacts/VWBench/.github/workflows/{}.yml", n),
                format!("vwbench_workflow{}", n),
            )
        })
        .collect()
});

/// A workflow file handed to the subject command.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WorkflowTarget {
    /// Path to the workflow file, relative to the subject's working directory
    pub path: String,

    /// Short name used in result rows and artifact file names
    pub name: String,
}

impl WorkflowTarget {
    /// Creates a new target.
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into().trim().to_string(),
            name: name.into().trim().to_string(),
        }
    }
}

/// Resource usage summarised from one sampler output file.
///
/// Rates are per sampler interval, converted from raw byte counters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceSummary {
    /// Mean of user + system CPU percentage
    pub avg_cpu_percent: f64,
    /// Maximum memory in use, in megabytes
    pub peak_memory_mb: f64,
    pub avg_disk_read_kb: f64,
    pub avg_disk_write_kb: f64,
    pub avg_net_recv_kb: f64,
    pub avg_net_send_kb: f64,
}

/// The result of one successful run.
///
/// `resources` is only present when sampling was enabled for the suite.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunRecord {
    pub workflow_name: String,
    pub run_number: u32,
    pub execution_time_seconds: f64,
    pub resources: Option<ResourceSummary>,
    /// Wall-clock time the run started, in [`TIMESTAMP_FORMAT`]
    pub timestamp: String,
}

impl RunRecord {
    /// Creates a record without resource data.
    pub fn new(
        workflow_name: impl Into<String>,
        run_number: u32,
        execution_time_seconds: f64,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            run_number,
            execution_time_seconds,
            resources: None,
            timestamp: timestamp.into(),
        }
    }

    /// Attaches a resource summary.
    pub fn with_resources(mut self, resources: ResourceSummary) -> Self {
        self.resources = Some(resources);
        self
    }
}

/// Returns the current local time in [`TIMESTAMP_FORMAT`].
pub fn current_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
