//! Sampler Output Parsing
//!
//! Summarises the CSV file written by `dstat --time --cpu --mem --net
//! --disk --swap --output <file>` into a [`ResourceSummary`].
//!
//! The file starts with banner and header rows, followed by one data row
//! per sampling interval:
//!
//! | column | meaning            | conversion    |
//! |--------|--------------------|---------------|
//! | 1, 2   | cpu user%, system% | summed        |
//! | 6      | memory used, bytes | / 1024² (MB)  |
//! | 10, 11 | net recv, send     | / 1024 (KB)   |
//! | 12, 13 | disk read, write   | / 1024 (KB)   |

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, ReaderBuilder};
use log::debug;

use crate::error::SamplerParseError;
use crate::suite::ResourceSummary;

/// Banner and header rows preceding the first data row.
pub const HEADER_ROWS: usize = 6;

/// Data rows narrower than this are ignored entirely.
pub const MIN_DATA_COLUMNS: usize = 14;

const COL_CPU_USER: usize = 1;
const COL_CPU_SYSTEM: usize = 2;
const COL_MEM_USED: usize = 6;
const COL_NET_RECV: usize = 10;
const COL_NET_SEND: usize = 11;
const COL_DISK_READ: usize = 12;
const COL_DISK_WRITE: usize = 13;

const KB: f64 = 1024.0;
const MB: f64 = 1024.0 * 1024.0;

/// Per-metric sample series collected from the data rows.
#[derive(Debug, Default)]
struct MetricSeries {
    cpu: Vec<f64>,
    memory: Vec<f64>,
    disk_read: Vec<f64>,
    disk_write: Vec<f64>,
    net_recv: Vec<f64>,
    net_send: Vec<f64>,
}

impl MetricSeries {
    /// Adds one data row. A cell that fails to parse only drops its own
    /// metric for this row.
    fn push_row(&mut self, record: &ByteRecord) {
        if record.len() < MIN_DATA_COLUMNS {
            return;
        }

        if let (Some(user), Some(system)) = (
            parse_cell(record, COL_CPU_USER),
            parse_cell(record, COL_CPU_SYSTEM),
        ) {
            self.cpu.push(user + system);
        }

        if let Some(mem) = parse_cell(record, COL_MEM_USED) {
            self.memory.push(mem / MB);
        }
        if let Some(read) = parse_cell(record, COL_DISK_READ) {
            self.disk_read.push(read / KB);
        }
        if let Some(write) = parse_cell(record, COL_DISK_WRITE) {
            self.disk_write.push(write / KB);
        }
        if let Some(recv) = parse_cell(record, COL_NET_RECV) {
            self.net_recv.push(recv / KB);
        }
        if let Some(send) = parse_cell(record, COL_NET_SEND) {
            self.net_send.push(send / KB);
        }
    }

    fn summarize(&self) -> ResourceSummary {
        ResourceSummary {
            avg_cpu_percent: mean(&self.cpu),
            peak_memory_mb: peak(&self.memory),
            avg_disk_read_kb: mean(&self.disk_read),
            avg_disk_write_kb: mean(&self.disk_write),
            avg_net_recv_kb: mean(&self.net_recv),
            avg_net_send_kb: mean(&self.net_send),
        }
    }
}

/// Parses a sampler output file.
///
/// # Returns
///
/// * `Ok(ResourceSummary)` - Metrics with no valid samples are 0
/// * `Err(SamplerParseError::NoData)` - The file has no rows past the header block
/// * `Err` - The file could not be read or is not valid CSV
pub fn parse_sampler_output(path: impl AsRef<Path>) -> Result<ResourceSummary, SamplerParseError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let summary = parse_sampler_reader(file)?;
    debug!("Parsed sampler output {}: {:?}", path.display(), summary);
    Ok(summary)
}

/// Parses sampler output from any reader.
pub fn parse_sampler_reader<R: Read>(reader: R) -> Result<ResourceSummary, SamplerParseError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let records = csv_reader
        .byte_records()
        .collect::<Result<Vec<ByteRecord>, csv::Error>>()?;

    if records.len() <= HEADER_ROWS {
        return Err(SamplerParseError::NoData);
    }

    let mut series = MetricSeries::default();
    for record in &records[HEADER_ROWS..] {
        series.push_row(record);
    }

    debug!(
        "Sampler rows: {} total, {} with cpu data",
        records.len() - HEADER_ROWS,
        series.cpu.len()
    );

    Ok(series.summarize())
}

/// Cells are read as bytes: a non-UTF-8 cell fails like any other
/// non-numeric cell instead of failing the whole file.
fn parse_cell(record: &ByteRecord, index: usize) -> Option<f64> {
    std::str::from_utf8(record.get(index)?)
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn peak(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const BANNER: &str = "\"Dstat 0.7.4 CSV output\"\n\
\"Author:\",\"Dag Wieers <dag@wieers.com>\",,,,\"URL:\",\"http://dag.wieers.com/home-made/dstat/\"\n\
\"Host:\",\"bench-host\",,,,\"User:\",\"bench\"\n\
\"Cmdline:\",\"dstat --time --cpu --mem --net --disk --swap --output x.csv\",,,,\"Date:\",\"01 Jan 2024 00:00:00 UTC\"\n\
\n\
\"system\",\"total cpu usage\",,,,,\"memory usage\",,,,\"net/total\",,\"dsk/total\",,\"swap\",\n\
\"time\",\"usr\",\"sys\",\"idl\",\"wai\",\"stl\",\"used\",\"free\",\"buff\",\"cach\",\"recv\",\"send\",\"read\",\"writ\",\"used\",\"free\"\n";

    /// Builds a 16-column data row.
    fn row(usr: &str, sys: &str, mem: &str, recv: &str, send: &str, read: &str, write: &str) -> String {
        format!(
            "01-01 00:00:00,{usr},{sys},95.0,0.5,0,{mem},1000,2000,3000,{recv},{send},{read},{write},0,4096\n"
        )
    }

    fn parse(text: &str) -> Result<ResourceSummary, SamplerParseError> {
        parse_sampler_reader(text.as_bytes())
    }

    #[test]
    fn test_header_only_is_no_data() {
        let result = parse(BANNER);
        assert!(matches!(result, Err(SamplerParseError::NoData)));
    }

    #[test]
    fn test_empty_input_is_no_data() {
        assert!(matches!(parse(""), Err(SamplerParseError::NoData)));
    }

    #[test]
    fn test_fewer_than_seven_rows_is_no_data() {
        let text = "a\nb\nc\nd\ne\nf\n";
        assert!(matches!(parse(text), Err(SamplerParseError::NoData)));
    }

    #[test]
    fn test_average_cpu() {
        let mut text = BANNER.to_string();
        text.push_str(&row("2.0", "1.0", "0", "0", "0", "0", "0"));
        text.push_str(&row("3.0", "1.5", "0", "0", "0", "0", "0"));

        let summary = parse(&text).unwrap();
        assert!((summary.avg_cpu_percent - 3.75).abs() < 1e-9);
    }

    #[test]
    fn test_peak_memory_is_maximum() {
        let mut text = BANNER.to_string();
        text.push_str(&row("0", "0", "1048576", "0", "0", "0", "0"));
        text.push_str(&row("0", "0", "2097152", "0", "0", "0", "0"));
        text.push_str(&row("0", "0", "1572864", "0", "0", "0", "0"));

        let summary = parse(&text).unwrap();
        assert_eq!(summary.peak_memory_mb, 2.0);
    }

    #[test]
    fn test_io_rates_converted_to_kb() {
        let mut text = BANNER.to_string();
        text.push_str(&row("0", "0", "0", "1024", "2048", "4096", "8192"));
        text.push_str(&row("0", "0", "0", "3072", "2048", "0", "8192"));

        let summary = parse(&text).unwrap();
        assert_eq!(summary.avg_net_recv_kb, 2.0);
        assert_eq!(summary.avg_net_send_kb, 2.0);
        assert_eq!(summary.avg_disk_read_kb, 2.0);
        assert_eq!(summary.avg_disk_write_kb, 8.0);
    }

    #[test]
    fn test_short_rows_are_ignored() {
        let mut text = BANNER.to_string();
        text.push_str("01-01 00:00:00,50.0,50.0,0,0,0,999999999\n");
        text.push_str(&row("2.0", "2.0", "1048576", "0", "0", "0", "0"));

        let summary = parse(&text).unwrap();
        assert_eq!(summary.avg_cpu_percent, 4.0);
        assert_eq!(summary.peak_memory_mb, 1.0);
    }

    #[test]
    fn test_bad_cell_drops_only_its_metric() {
        let mut text = BANNER.to_string();
        text.push_str(&row("n/a", "1.0", "2097152", "1024", "1024", "1024", "1024"));
        text.push_str(&row("4.0", "2.0", "1048576", "3072", "1024", "1024", "1024"));

        let summary = parse(&text).unwrap();
        // Only the second row has valid cpu
        assert_eq!(summary.avg_cpu_percent, 6.0);
        // Memory from both rows
        assert_eq!(summary.peak_memory_mb, 2.0);
        assert_eq!(summary.avg_net_recv_kb, 2.0);
    }

    #[test]
    fn test_cells_with_whitespace() {
        let mut text = BANNER.to_string();
        text.push_str(&row(" 1.5 ", " 0.5", "1048576 ", " 1024 ", "0", "0", "0"));

        let summary = parse(&text).unwrap();
        assert_eq!(summary.avg_cpu_percent, 2.0);
        assert_eq!(summary.peak_memory_mb, 1.0);
        assert_eq!(summary.avg_net_recv_kb, 1.0);
    }

    #[test]
    fn test_no_valid_samples_defaults_to_zero() {
        let mut text = BANNER.to_string();
        text.push_str("short,row\n");

        let summary = parse(&text).unwrap();
        assert_eq!(summary, ResourceSummary::default());
    }

    #[test]
    fn test_parse_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.csv");
        let mut text = BANNER.to_string();
        text.push_str(&row("10.0", "5.0", "3145728", "0", "0", "0", "0"));
        fs::write(&path, text).unwrap();

        let summary = parse_sampler_output(&path).unwrap();
        assert_eq!(summary.avg_cpu_percent, 15.0);
        assert_eq!(summary.peak_memory_mb, 3.0);
    }

    #[test]
    fn test_parse_missing_file() {
        let result = parse_sampler_output("/nonexistent/sample.csv");
        assert!(matches!(result, Err(SamplerParseError::Io(_))));
    }

    #[test]
    fn test_blank_banner_line_not_counted() {
        // dstat leaves an empty line after the Cmdline row
        assert!(BANNER.contains("\n\n"));
        let mut text = BANNER.to_string();
        text.push_str(&row("1.0", "1.0", "0", "0", "0", "0", "0"));

        let summary = parse(&text).unwrap();
        assert_eq!(summary.avg_cpu_percent, 2.0);
    }

    #[test]
    fn test_non_utf8_banner_is_ignored() {
        let mut bytes = b"\"Dstat 0.7.4 CSV output\"\n".to_vec();
        bytes.extend_from_slice(b"\"Author:\",\"Dag Wieers\"\n");
        bytes.extend_from_slice(b"\"Host:\",\"caf\xe9-host\"\n");
        bytes.extend_from_slice(b"\"Cmdline:\",\"dstat\",,,,\"Date:\",\"01 janv. 2024\"\n\n");
        bytes.extend_from_slice(b"\"system\",\"total cpu usage\"\n");
        bytes.extend_from_slice(b"\"time\",\"usr\",\"sys\"\n");
        bytes.extend_from_slice(row("2.0", "1.0", "1048576", "0", "0", "0", "0").as_bytes());

        let summary = parse_sampler_reader(bytes.as_slice()).unwrap();
        assert_eq!(summary.avg_cpu_percent, 3.0);
        assert_eq!(summary.peak_memory_mb, 1.0);
    }

    #[test]
    fn test_non_utf8_cell_drops_only_its_metric() {
        let mut bytes = BANNER.as_bytes().to_vec();
        bytes.extend_from_slice(row("2.0", "1.0", "1048576", "0", "0", "0", "0").as_bytes());
        bytes.extend_from_slice(b"01-01 00:00:01,\xff,1.0,95.0,0.5,0,2097152,1000,2000,3000,0,0,0,0,0,4096\n");

        let summary = parse_sampler_reader(bytes.as_slice()).unwrap();
        // CPU from the first row only, memory from both
        assert_eq!(summary.avg_cpu_percent, 3.0);
        assert_eq!(summary.peak_memory_mb, 2.0);
    }

    #[test]
    fn test_mean_and_peak_helpers() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
        assert_eq!(peak(&[]), 0.0);
        assert_eq!(peak(&[1.0, 5.0, 3.0]), 5.0);
    }
}
