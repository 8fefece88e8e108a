//! Argus Bench CLI Entry Point
//!
//! # Usage
//!
//! ```bash
//! # Run the built-in suite with default parameters
//! argus-bench
//!
//! # Run with parameters from a config file
//! argus-bench bench.yaml
//!
//! # Debug logging (subject stdout, sampler details)
//! argus-bench bench.yaml --verbose
//! ```

use std::env;
use std::process::ExitCode;

use log::{error, info};

use argus_bench::{load_config, BenchConfig, BenchmarkDriver, APP_NAME, VERSION};

/// Command-line options. Run parameters live in the config file.
#[derive(Debug, Default)]
struct CliOptions {
    config_path: Option<String>,
    verbose: bool,
}

/// Configures the logging system with appropriate formatting.
fn setup_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format(|buf, record| {
            use std::io::Write;

            match record.level() {
                log::Level::Warn | log::Level::Error => {
                    writeln!(buf, "[{}] {}", record.level(), record.args())
                }
                _ => writeln!(buf, "{}", record.args()),
            }
        })
        .init();
}

/// Prints the application banner with version information.
fn print_banner() {
    println!();
    println!("{} v{}", APP_NAME, VERSION);
    println!("Workflow Analysis Benchmarking Harness");
    println!();
}

/// Prints usage information.
fn print_usage() {
    println!("Usage: argus-bench [OPTIONS] [CONFIG_FILE]");
    println!();
    println!("Arguments:");
    println!("  [CONFIG_FILE]       YAML file with suite parameters (defaults built in)");
    println!();
    println!("Options:");
    println!("  --verbose           Enable debug logging");
    println!("  --help              Show this help message");
    println!("  --version           Show version information");
}

/// Parses command-line arguments into CliOptions.
fn parse_arguments(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--version" | "-V" => {
                println!("{} {}", APP_NAME, VERSION);
                std::process::exit(0);
            }
            "--verbose" | "-v" => {
                options.verbose = true;
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            _ => {
                if options.config_path.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                options.config_path = Some(arg.clone());
            }
        }
    }

    Ok(options)
}

/// Main application entry point.
fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let options = parse_arguments(&args).map_err(|e| {
        eprintln!("Error: {}", e);
        eprintln!();
        print_usage();
        e
    })?;

    setup_logging(options.verbose);
    print_banner();

    let config = match &options.config_path {
        Some(path) => load_config(path).map_err(|e| {
            error!("Failed to load config: {}", e);
            e
        })?,
        None => {
            info!("No config file given, using built-in defaults");
            BenchConfig::default()
        }
    };

    let targets = config.effective_targets();
    let driver = BenchmarkDriver::new(config);
    driver.run(&targets)?;

    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
