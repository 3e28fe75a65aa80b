//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// Latency Metrics - per-region latency and uptime summaries over HTTP
///
/// Serves `POST /calculate-metrics`, which groups a batch of latency
/// samples by region and returns average, minimum and maximum latency,
/// average uptime and the record count for every region.
///
/// Examples:
///   latency-metrics
///   latency-metrics --host 0.0.0.0 --port 8080
///   latency-metrics --input samples.json --output metrics.json
///   latency-metrics --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Address to bind the HTTP server to
    ///
    /// Overrides the `[server] host` config value (default 127.0.0.1).
    #[arg(long, value_name = "HOST", env = "LATENCY_METRICS_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    ///
    /// Overrides the `[server] port` config value (default 8000).
    #[arg(short, long, value_name = "PORT", env = "LATENCY_METRICS_PORT")]
    pub port: Option<u16>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .latency-metrics.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable cross-origin resource sharing headers
    #[arg(long)]
    pub no_cors: bool,

    /// Maximum request body size in bytes
    #[arg(long, value_name = "BYTES")]
    pub max_body_bytes: Option<usize>,

    /// Aggregate a request file instead of starting the server
    ///
    /// The file uses the same JSON schema as the POST body:
    /// {"data": [{"region", "service", "latency_ms", "uptime_pct", "timestamp"}]}
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write --input results to this file instead of stdout
    #[arg(short, long, value_name = "FILE", requires = "input")]
    pub output: Option<PathBuf>,

    /// Generate a default .latency-metrics.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.port == Some(0) {
            return Err("Port must be between 1 and 65535".to_string());
        }

        if self.max_body_bytes == Some(0) {
            return Err("Max body size must be at least 1 byte".to_string());
        }

        if let Some(ref input) = self.input {
            if !input.is_file() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
