//! Background Resource Sampler
//!
//! Runs the external sampler (dstat by default) for the duration of one
//! benchmark run. The process handle is owned by [`SamplerProcess`], which
//! kills and reaps the sampler when dropped, so no sampler outlives the run
//! that started it regardless of how that run ends.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use log::{debug, trace};

use crate::error::RunError;
use crate::suite::SamplerConfig;

/// A running sampler process writing to a per-run output file.
#[derive(Debug)]
pub struct SamplerProcess {
    child: Option<Child>,
    output_path: PathBuf,
}

impl SamplerProcess {
    /// Starts the sampler in the background.
    ///
    /// The output file path is appended as the last argument. Sampler
    /// stdout and stderr are discarded.
    pub fn start(config: &SamplerConfig, output_path: impl Into<PathBuf>) -> Result<Self, RunError> {
        let output_path = output_path.into();

        let child = Command::new(&config.program)
            .args(&config.args)
            .arg(&output_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| RunError::SamplerLaunch {
                program: config.program.clone(),
                source,
            })?;

        debug!(
            "Started sampler '{}' (pid {}) writing to {}",
            config.program,
            child.id(),
            output_path.display()
        );

        Ok(Self {
            child: Some(child),
            output_path,
        })
    }

    /// File the sampler writes its samples to.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// OS process id of the sampler, if it has not been stopped yet.
    #[cfg(test)]
    pub(crate) fn id(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }

    /// Kills the sampler and waits for it to exit.
    ///
    /// Kill and wait failures are ignored: the sampler may already have
    /// exited on its own. Calling this more than once is a no-op.
    pub fn stop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        trace!("Stopping sampler (pid {})", child.id());

        if let Err(e) = child.kill() {
            trace!("Sampler kill failed (already exited?): {}", e);
        }

        match child.wait() {
            Ok(status) => trace!("Sampler exited: {}", status),
            Err(e) => trace!("Failed to wait for sampler: {}", e),
        }
    }
}

impl Drop for SamplerProcess {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use std::time::{Duration, Instant};
    use tempfile::tempdir;

    fn shell_sampler(script: &str) -> SamplerConfig {
        SamplerConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "sampler".to_string()],
        }
    }

    /// Returns true if a process with this pid still exists.
    fn process_alive(pid: u32) -> bool {
        Path::new(&format!("/proc/{}", pid)).exists()
    }

    #[test]
    fn test_start_writes_to_output_path() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("samples.csv");
        let config = shell_sampler("echo sample > \"$1\"; exec sleep 30");

        let mut sampler = SamplerProcess::start(&config, &output).unwrap();
        assert_eq!(sampler.output_path(), output.as_path());

        let deadline = Instant::now() + Duration::from_secs(5);
        while fs::read_to_string(&output).map_or(true, |s| s.is_empty()) && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(20));
        }
        sampler.stop();

        assert_eq!(fs::read_to_string(&output).unwrap().trim(), "sample");
    }

    #[test]
    fn test_stop_kills_process() {
        let dir = tempdir().unwrap();
        let config = shell_sampler("exec sleep 30");

        let mut sampler = SamplerProcess::start(&config, dir.path().join("s.csv")).unwrap();
        let pid = sampler.id().unwrap();
        assert!(process_alive(pid));

        sampler.stop();
        assert!(sampler.id().is_none());
        assert!(!process_alive(pid));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let dir = tempdir().unwrap();
        let config = shell_sampler("exec sleep 30");

        let mut sampler = SamplerProcess::start(&config, dir.path().join("s.csv")).unwrap();
        sampler.stop();
        sampler.stop();
        assert!(sampler.id().is_none());
    }

    #[test]
    fn test_stop_after_sampler_exited() {
        let dir = tempdir().unwrap();
        let config = shell_sampler("exit 0");

        let mut sampler = SamplerProcess::start(&config, dir.path().join("s.csv")).unwrap();
        thread::sleep(Duration::from_millis(100));
        // Kill on an exited child must not panic
        sampler.stop();
    }

    #[test]
    fn test_drop_kills_process() {
        let dir = tempdir().unwrap();
        let config = shell_sampler("exec sleep 30");

        let pid = {
            let sampler = SamplerProcess::start(&config, dir.path().join("s.csv")).unwrap();
            sampler.id().unwrap()
        };

        assert!(!process_alive(pid));
    }

    #[test]
    fn test_launch_failure() {
        let config = SamplerConfig {
            program: "/nonexistent/sampler-binary".to_string(),
            args: Vec::new(),
        };

        let err = SamplerProcess::start(&config, "s.csv").unwrap_err();
        assert!(matches!(err, RunError::SamplerLaunch { .. }));
        assert!(err.to_string().contains("/nonexistent/sampler-binary"));
    }
}
