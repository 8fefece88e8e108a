//! Results Sink
//!
//! Appends one CSV row per completed run and flushes after every row, so
//! the file on disk always holds every result gathered so far.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use crate::error::{SetupError, SinkError};
use crate::suite::RunRecord;

/// Columns written when resource sampling is enabled.
pub const SAMPLING_HEADER: [&str; 10] = [
    "workflow_file",
    "run_number",
    "execution_time_seconds",
    "avg_cpu_percent",
    "peak_memory_mb",
    "avg_disk_read_kb",
    "avg_disk_write_kb",
    "avg_net_recv_kb",
    "avg_net_send_kb",
    "timestamp",
];

/// Columns written for timing-only suites.
pub const TIMING_HEADER: [&str; 4] = [
    "workflow_file",
    "run_number",
    "execution_time_seconds",
    "timestamp",
];

/// Incremental CSV writer for [`RunRecord`]s.
pub struct ResultsSink<W: Write> {
    writer: Writer<W>,
    sampling_enabled: bool,
}

impl ResultsSink<File> {
    /// Creates (truncating) the results file and writes its header.
    pub fn create(path: impl AsRef<Path>, sampling_enabled: bool) -> Result<Self, SetupError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| SetupError::CreateSink {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_writer(file, sampling_enabled).map_err(SetupError::WriteHeader)
    }
}

impl<W: Write> ResultsSink<W> {
    /// Wraps a writer and writes the header row for the chosen column set.
    pub fn from_writer(inner: W, sampling_enabled: bool) -> Result<Self, SinkError> {
        let mut sink = Self {
            writer: Writer::from_writer(inner),
            sampling_enabled,
        };

        if sampling_enabled {
            sink.writer.write_record(SAMPLING_HEADER)?;
        } else {
            sink.writer.write_record(TIMING_HEADER)?;
        }
        sink.writer.flush()?;

        Ok(sink)
    }

    /// Writes one record and flushes it to the underlying writer.
    pub fn append(&mut self, record: &RunRecord) -> Result<(), SinkError> {
        self.writer.write_record(format_row(record, self.sampling_enabled))?;
        self.writer.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    #[cfg(test)]
    pub(crate) fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

/// Formats a record as CSV cells. Execution time gets 3 decimals, every
/// other float 2.
pub fn format_row(record: &RunRecord, sampling_enabled: bool) -> Vec<String> {
    let mut row = vec![
        record.workflow_name.clone(),
        record.run_number.to_string(),
        format!("{:.3}", record.execution_time_seconds),
    ];

    if sampling_enabled {
        let resources = record.resources.unwrap_or_default();
        row.extend([
            format!("{:.2}", resources.avg_cpu_percent),
            format!("{:.2}", resources.peak_memory_mb),
            format!("{:.2}", resources.avg_disk_read_kb),
            format!("{:.2}", resources.avg_disk_write_kb),
            format!("{:.2}", resources.avg_net_recv_kb),
            format!("{:.2}", resources.avg_net_send_kb),
        ]);
    }

    row.push(record.timestamp.clone());
    row
}
