//! Benchmark Configuration
//!
//! Fixed run parameters for a suite: how many repetitions, whether the
//! resource sampler runs, the stabilisation delays and the commands used
//! for the subject and the sampler.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```yaml
//! repetitions: 5
//! sampling_enabled: false
//! subject:
//!   working_dir: /opt/argus
//! targets:
//!   - name: smoke
//!     path: tests/smoke.yml
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::model::{WorkflowTarget, DEFAULT_TARGETS};
use crate::error::SetupError;

/// How the program under measurement is invoked.
///
/// The driver appends `--mode <mode> --file <target> --output <artifact>`
/// to `args`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SubjectConfig {
    pub program: String,
    pub args: Vec<String>,
    pub mode: String,
    /// Working directory for the subject; `None` inherits the harness cwd
    pub working_dir: Option<PathBuf>,
    /// Extension of the artifact the subject writes for each run
    pub output_extension: String,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            program: "poetry".to_string(),
            args: vec!["run".to_string(), "python3".to_string(), "argus.py".to_string()],
            mode: "file".to_string(),
            working_dir: Some(PathBuf::from("..")),
            output_extension: "sarif".to_string(),
        }
    }
}

/// How the background resource sampler is invoked.
///
/// The per-run output file path is appended after `args`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SamplerConfig {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            program: "dstat".to_string(),
            args: ["--time", "--cpu", "--mem", "--net", "--disk", "--swap", "--output"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Complete configuration for a benchmark suite.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct BenchConfig {
    /// Runs per target
    pub repetitions: u32,
    pub sampling_enabled: bool,
    /// Pause between starting the sampler and starting the subject
    pub warmup_secs: u64,
    /// Pause between subject exit and stopping the sampler
    pub cooldown_secs: u64,
    /// Pause after each run before the next one starts
    pub inter_run_secs: u64,
    pub results_dir: PathBuf,
    pub results_file: String,
    /// Subdirectory of `results_dir` holding raw sampler files
    pub raw_sampler_dir: String,
    pub subject: SubjectConfig,
    pub sampler: SamplerConfig,
    /// Targets to benchmark; empty selects [`DEFAULT_TARGETS`]
    pub targets: Vec<WorkflowTarget>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            repetitions: 3,
            sampling_enabled: true,
            warmup_secs: 10,
            cooldown_secs: 10,
            inter_run_secs: 2,
            results_dir: PathBuf::from("results"),
            results_file: "benchmark_results.csv".to_string(),
            raw_sampler_dir: "raw_dstat".to_string(),
            subject: SubjectConfig::default(),
            sampler: SamplerConfig::default(),
            targets: Vec::new(),
        }
    }
}

impl BenchConfig {
    pub fn warmup_delay(&self) -> Duration {
        Duration::from_secs(self.warmup_secs)
    }

    pub fn cooldown_delay(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn inter_run_delay(&self) -> Duration {
        Duration::from_secs(self.inter_run_secs)
    }

    /// Returns the configured targets, or the built-in catalogue if none.
    pub fn effective_targets(&self) -> Vec<WorkflowTarget> {
        if self.targets.is_empty() {
            DEFAULT_TARGETS.clone()
        } else {
            self.targets.clone()
        }
    }

    /// Directory holding one raw sampler file per run.
    pub fn raw_sampler_path(&self) -> PathBuf {
        self.results_dir.join(&self.raw_sampler_dir)
    }

    /// Checks the configuration for values the driver cannot work with.
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.repetitions == 0 {
            return Err(invalid("repetitions must be at least 1"));
        }

        if self.subject.program.trim().is_empty() {
            return Err(invalid("subject program must not be empty"));
        }

        if self.sampling_enabled && self.sampler.program.trim().is_empty() {
            return Err(invalid("sampler program must not be empty when sampling is enabled"));
        }

        if self.results_file.trim().is_empty() {
            return Err(invalid("results file name must not be empty"));
        }

        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.name.trim().is_empty() {
                return Err(invalid(format!("target '{}' has an empty name", target.path)));
            }
            if !seen.insert(&target.name) {
                return Err(invalid(format!("duplicate target name: '{}'", target.name)));
            }
        }

        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> SetupError {
    SetupError::InvalidConfig(message.into())
}

/// Loads and validates a configuration file.
///
/// # Example
///
/// ```rust,no_run
/// use argus_bench::suite::load_config;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = load_config("bench.yaml")?;
///     println!("{} repetitions", config.repetitions);
///     Ok(())
/// }
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<BenchConfig, SetupError> {
    let path = path.as_ref();
    info!("Loading config from: {}", path.display());

    let yaml_content = fs::read_to_string(path).map_err(|source| SetupError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("YAML content loaded ({} bytes)", yaml_content.len());

    let config = parse_config(&yaml_content).map_err(|source| SetupError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;

    config.validate()?;
    Ok(config)
}

/// Parses configuration from YAML text without validating it.
pub fn parse_config(yaml: &str) -> Result<BenchConfig, serde_yaml::Error> {
    // An empty document deserialises to unit, not to a defaulted struct.
    if yaml.trim().is_empty() {
        return Ok(BenchConfig::default());
    }
    serde_yaml::from_str(yaml)
}
