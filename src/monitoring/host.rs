//! Host Information
//!
//! Snapshot of the machine a suite runs on, logged at startup and stored
//! in the suite summary so result files can be compared across hosts.

use serde::{Deserialize, Serialize};
use sysinfo::System;

/// Static facts about the benchmark host.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HostInfo {
    pub hostname: Option<String>,
    pub os: Option<String>,
    pub kernel: Option<String>,
    pub logical_cpus: usize,
    pub physical_cpus: usize,
    pub total_memory_mb: u64,
}

impl HostInfo {
    /// Collects host information from the running system.
    pub fn collect() -> Self {
        let mut system = System::new();
        system.refresh_memory();

        Self {
            hostname: System::host_name(),
            os: System::long_os_version(),
            kernel: System::kernel_version(),
            logical_cpus: num_cpus::get(),
            physical_cpus: num_cpus::get_physical(),
            total_memory_mb: system.total_memory() / (1024 * 1024),
        }
    }

    /// One-line description for logs.
    pub fn describe(&self) -> String {
        format!(
            "{} ({}), {} logical / {} physical CPUs, {} MB memory",
            self.hostname.as_deref().unwrap_or("unknown host"),
            self.os.as_deref().unwrap_or("unknown OS"),
            self.logical_cpus,
            self.physical_cpus,
            self.total_memory_mb
        )
    }
}
