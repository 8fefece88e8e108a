//! Benchmark Driver
//!
//! Runs every target the configured number of times, strictly one run at
//! a time. Each run:
//!
//! 1. Starts the resource sampler and waits out the warm-up delay
//! 2. Runs the subject command and times it
//! 3. Waits out the cool-down delay, stops the sampler and summarises
//!    its output
//! 4. Appends the record to the results file
//! 5. Sleeps the inter-run delay
//!
//! A failing run is logged and skipped. Only setup failures (results
//! directory, results file, configuration) abort the suite.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use log::{error, info, warn};

use crate::error::{RunError, SetupError};
use crate::monitoring::{parse_sampler_output, HostInfo, SamplerProcess};
use crate::report::{FailedRun, ResultsSink, SuiteSummary, SUMMARY_FILE_NAME};
use crate::suite::{current_timestamp, BenchConfig, ResourceSummary, RunRecord, WorkflowTarget};

use super::subject::run_subject;

/// Where a suite writes its files.
#[derive(Debug, Clone)]
pub struct ResultsLayout {
    /// Absolute results directory
    pub results_dir: PathBuf,
    pub results_file: PathBuf,
    pub raw_sampler_dir: PathBuf,
}

impl ResultsLayout {
    /// Creates the results directories and resolves them to absolute paths.
    ///
    /// Paths are absolute so artifacts land in the results directory even
    /// though the subject runs in its own working directory.
    pub fn prepare(config: &BenchConfig) -> Result<Self, SetupError> {
        let raw_dir = config.raw_sampler_path();
        fs::create_dir_all(&raw_dir).map_err(|source| SetupError::CreateDir {
            path: raw_dir.clone(),
            source,
        })?;

        let results_dir =
            fs::canonicalize(&config.results_dir).map_err(|source| SetupError::CreateDir {
                path: config.results_dir.clone(),
                source,
            })?;

        Ok(Self {
            results_file: results_dir.join(&config.results_file),
            raw_sampler_dir: results_dir.join(&config.raw_sampler_dir),
            results_dir,
        })
    }

    /// Path of the artifact the subject writes for one run.
    pub fn artifact_path(&self, workflow_name: &str, run_number: u32, extension: &str) -> PathBuf {
        self.results_dir
            .join(format!("{}_run{}.{}", workflow_name, run_number, extension))
    }

    /// Path of the raw sampler file for one run.
    pub fn sampler_file(&self, workflow_name: &str, run_number: u32, timestamp: &str) -> PathBuf {
        self.raw_sampler_dir
            .join(format!("{}_run{}_{}.csv", workflow_name, run_number, timestamp))
    }
}

/// Result of one run attempt.
#[derive(Debug)]
pub struct RunOutcome {
    pub workflow_name: String,
    pub run_number: u32,
    pub result: Result<RunRecord, RunError>,
}

/// Everything a finished suite produced.
#[derive(Debug)]
pub struct SuiteReport {
    pub results_file: PathBuf,
    pub outcomes: Vec<RunOutcome>,
}

impl SuiteReport {
    /// Records of the runs that completed, in run order.
    pub fn records(&self) -> impl Iterator<Item = &RunRecord> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok())
    }

    /// Runs that were skipped, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = &RunOutcome> {
        self.outcomes.iter().filter(|o| o.result.is_err())
    }

    pub fn completed_count(&self) -> usize {
        self.records().count()
    }
}

/// Sequential benchmark driver.
///
/// # Example
///
/// ```rust,no_run
/// use argus_bench::execution::BenchmarkDriver;
/// use argus_bench::suite::BenchConfig;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = BenchConfig::default();
///     let targets = config.effective_targets();
///
///     let driver = BenchmarkDriver::new(config);
///     let report = driver.run(&targets)?;
///     println!("{} runs completed", report.completed_count());
///     Ok(())
/// }
/// ```
pub struct BenchmarkDriver {
    config: BenchConfig,
}

impl BenchmarkDriver {
    pub fn new(config: BenchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    /// Runs the full target × repetition matrix.
    ///
    /// Rows are appended to the results file as each run completes.
    ///
    /// # Returns
    ///
    /// * `Ok(SuiteReport)` - The suite ran to the end; individual runs may have failed
    /// * `Err(SetupError)` - The suite could not start
    pub fn run(&self, targets: &[WorkflowTarget]) -> Result<SuiteReport, SetupError> {
        self.config.validate()?;

        let started_at = current_timestamp();
        let repetitions = self.config.repetitions;
        let sampling = self.config.sampling_enabled;

        info!("Starting Argus Benchmarking Suite");
        info!(
            "Testing {} workflows with {} runs each",
            targets.len(),
            repetitions
        );
        if sampling {
            info!("Resource sampling ({}): ENABLED", self.config.sampler.program);
        } else {
            info!("Resource sampling: DISABLED (timing only)");
        }

        let host = HostInfo::collect();
        info!("Host: {}", host.describe());

        let layout = ResultsLayout::prepare(&self.config)?;
        let mut sink = ResultsSink::create(&layout.results_file, sampling)?;

        let total_runs = targets.len() * repetitions as usize;
        let mut current_run = 0;
        let mut outcomes = Vec::with_capacity(total_runs);

        for target in targets {
            info!("");
            info!("Testing workflow: {}", target.name);

            for run_number in 1..=repetitions {
                current_run += 1;
                info!(
                    "  [{}/{}] Run {}/{}",
                    current_run, total_runs, run_number, repetitions
                );

                let result = self.run_once(target, run_number, &layout);

                match &result {
                    Ok(record) => {
                        if let Err(e) = sink.append(record) {
                            warn!(
                                "Failed to write result for '{}' run {}: {}",
                                target.name, run_number, e
                            );
                        }
                        info!("    Completed in {:.2}s", record.execution_time_seconds);
                    }
                    Err(e) => {
                        error!("'{}' run {} skipped: {}", target.name, run_number, e);
                    }
                }

                outcomes.push(RunOutcome {
                    workflow_name: target.name.clone(),
                    run_number,
                    result,
                });

                thread::sleep(self.config.inter_run_delay());
            }
        }

        let report = SuiteReport {
            results_file: layout.results_file.clone(),
            outcomes,
        };

        let summary = SuiteSummary {
            started_at,
            finished_at: current_timestamp(),
            host,
            sampling_enabled: sampling,
            planned_runs: total_runs,
            completed_runs: report.completed_count(),
            failed_runs: report
                .failures()
                .map(|o| FailedRun {
                    workflow_name: o.workflow_name.clone(),
                    run_number: o.run_number,
                    error: o
                        .result
                        .as_ref()
                        .err()
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                })
                .collect(),
            results_file: layout.results_file.clone(),
        };

        if let Err(e) = summary.save(layout.results_dir.join(SUMMARY_FILE_NAME)) {
            warn!("Failed to save suite summary: {}", e);
        }

        info!("");
        info!(
            "Benchmarking complete! {}/{} runs succeeded. Results saved to: {}",
            summary.completed_runs,
            total_runs,
            layout.results_file.display()
        );

        Ok(report)
    }

    /// Executes a single run of one target.
    ///
    /// The sampler, when enabled, is stopped on every path out of this
    /// function: explicitly after the cool-down on success, by its drop
    /// guard if the subject fails.
    pub fn run_once(
        &self,
        target: &WorkflowTarget,
        run_number: u32,
        layout: &ResultsLayout,
    ) -> Result<RunRecord, RunError> {
        let timestamp = current_timestamp();
        let artifact = layout.artifact_path(
            &target.name,
            run_number,
            &self.config.subject.output_extension,
        );

        let sampler = if self.config.sampling_enabled {
            let sampler_file = layout.sampler_file(&target.name, run_number, &timestamp);
            let sampler = SamplerProcess::start(&self.config.sampler, sampler_file)?;
            thread::sleep(self.config.warmup_delay());
            Some(sampler)
        } else {
            None
        };

        let start = Instant::now();
        run_subject(&self.config.subject, target, &artifact)?;
        let execution_time = start.elapsed().as_secs_f64();

        let record = RunRecord::new(&target.name, run_number, execution_time, timestamp);

        let Some(mut sampler) = sampler else {
            return Ok(record);
        };

        thread::sleep(self.config.cooldown_delay());
        sampler.stop();

        let resources = summarize_sampler_file(sampler.output_path())?;
        Ok(record.with_resources(resources))
    }
}

fn summarize_sampler_file(path: &Path) -> Result<ResourceSummary, RunError> {
    parse_sampler_output(path).map_err(|source| RunError::SamplerOutput {
        path: path.to_path_buf(),
        source,
    })
}
