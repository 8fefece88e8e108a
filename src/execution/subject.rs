//! Subject Command Execution
//!
//! Invokes the program under measurement for one workflow target:
//!
//! ```text
//! <program> <args...> --mode <mode> --file <target path> --output <artifact>
//! ```
//!
//! The command runs to completion in the configured working directory and
//! its output is captured for logging.

use std::path::Path;
use std::process::Command;

use log::{debug, error};

use crate::error::RunError;
use crate::suite::{SubjectConfig, WorkflowTarget};

/// Builds the subject command for a target without running it.
pub fn build_subject_command(
    config: &SubjectConfig,
    target: &WorkflowTarget,
    output_path: &Path,
) -> Command {
    let mut cmd = Command::new(&config.program);
    cmd.args(&config.args)
        .arg("--mode")
        .arg(&config.mode)
        .arg("--file")
        .arg(&target.path)
        .arg("--output")
        .arg(output_path);

    if let Some(dir) = &config.working_dir {
        cmd.current_dir(dir);
    }

    cmd
}

/// Runs the subject command for one target and waits for it to exit.
///
/// # Returns
///
/// * `Ok(())` - The command exited with status zero
/// * `Err(RunError::SubjectLaunch)` - The command could not be started
/// * `Err(RunError::SubjectFailed)` - The command exited non-zero
pub fn run_subject(
    config: &SubjectConfig,
    target: &WorkflowTarget,
    output_path: &Path,
) -> Result<(), RunError> {
    let mut cmd = build_subject_command(config, target, output_path);

    if let Some(dir) = &config.working_dir {
        debug!("Executing '{}' in directory: {}", config.program, dir.display());
    }

    let output = cmd.output().map_err(|source| RunError::SubjectLaunch {
        program: config.program.clone(),
        source,
    })?;

    let stdout = String::from_utf8_lossy(&output.stdout);

    if output.status.success() {
        if !stdout.trim().is_empty() {
            debug!("Subject output for '{}':\n{}", target.name, stdout);
        }
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        error!("stderr:\n{}", stderr);
    }
    if !stdout.trim().is_empty() {
        debug!("stdout:\n{}", stdout);
    }

    Err(RunError::SubjectFailed {
        code: output.status.code(),
    })
}
