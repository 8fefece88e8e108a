//! Resource Monitoring Module
//!
//! Provides the background resource sampler used during benchmark runs
//! and the parsing of its output.
//!
//! # Components
//!
//! - [`SamplerProcess`]: Scoped handle on the external sampler process
//! - [`parse_sampler_output`]: Sampler CSV to [`ResourceSummary`](crate::suite::ResourceSummary)
//! - [`HostInfo`]: Host facts recorded alongside results

pub mod host;
pub mod parser;
pub mod sampler;

pub use host::HostInfo;
pub use parser::{parse_sampler_output, parse_sampler_reader};
pub use sampler::SamplerProcess;
