use clap::Parser;
use std::time::Duration;

use super::parsers::{
    parse_basis_points, parse_duration_arg, parse_pause_arg, parse_positive_u64,
    parse_positive_usize,
};
use super::types::{BasisPoints, PositiveU64, PositiveUsize};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Virtual-user HTTP load runner - concurrent users pick random targets, check status codes, and report latency percentiles against SLOs.",
    next_help_heading = "Advanced Options"
)]
pub struct RunArgs {
    /// Target URL (repeatable); each iteration picks one at random
    #[arg(long = "url", short = 'u', help_heading = "Common Options")]
    pub urls: Vec<String>,

    /// Read target URLs from a file (one per line, or CSV with a 'url' column)
    #[arg(long = "urls-file", short = 'f', help_heading = "Common Options")]
    pub urls_file: Option<String>,

    /// Number of concurrent virtual users
    #[arg(
        long = "vus",
        short = 'c',
        alias = "concurrency",
        default_value = "100",
        value_parser = parse_positive_usize,
        help_heading = "Common Options"
    )]
    pub vus: PositiveUsize,

    /// Total run duration (e.g. 30s, 2m, 1h)
    #[arg(
        long = "duration",
        short = 't',
        default_value = "2m",
        value_parser = parse_duration_arg,
        help_heading = "Common Options"
    )]
    pub duration: Duration,

    /// Pause taken by each virtual user after every iteration
    #[arg(long = "sleep", default_value = "1s", value_parser = parse_pause_arg)]
    pub sleep: Duration,

    /// Stop each virtual user after this many iterations
    #[arg(long = "iterations", short = 'n', value_parser = parse_positive_u64)]
    pub iterations: Option<PositiveU64>,

    /// Spread virtual user start times evenly over this window
    #[arg(long = "ramp-up", value_parser = parse_duration_arg)]
    pub ramp_up: Option<Duration>,

    /// Seed for target selection; user N draws from seed + N
    #[arg(long = "seed", env = "VULOAD_SEED")]
    pub seed: Option<u64>,

    /// Status code a response must have for its check to pass
    #[arg(long = "expected-status", default_value = "200")]
    pub expected_status: u16,

    /// Per-request timeout (no timeout when unset)
    #[arg(long = "timeout", value_parser = parse_duration_arg)]
    pub request_timeout: Option<Duration>,

    /// Maximum redirects to follow (0 disables redirects)
    #[arg(long = "redirect", default_value = "10")]
    pub redirect_limit: u32,

    /// Accept invalid TLS certificates and hostnames
    #[arg(long = "insecure", short = 'k')]
    pub insecure: bool,

    /// Write one CSV row per request to this path
    #[arg(long = "export-csv")]
    pub export_csv: Option<String>,

    /// Write the summary, SLO verdict and request records as JSON
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Write a Markdown run report to this path
    #[arg(long = "report")]
    pub report: Option<String>,

    /// p95 latency threshold in milliseconds
    #[arg(long = "slo-p95-ms", default_value = "1000", value_parser = parse_positive_u64)]
    pub slo_p95_ms: PositiveU64,

    /// Maximum failed-check rate in percent, at most two decimals (e.g. 1, 0.5, 0.01)
    #[arg(long = "slo-error-pct", default_value = "1", value_parser = parse_basis_points)]
    pub slo_error_rate: BasisPoints,

    /// Exit with an error when the SLO verdict is FAIL
    #[arg(long = "enforce-slo")]
    pub enforce_slo: bool,

    /// Maximum request records kept for exports
    #[arg(long = "metrics-max", default_value = "1000000", value_parser = parse_positive_usize)]
    pub metrics_max: PositiveUsize,

    /// Interval between progress log lines
    #[arg(long = "progress-interval", default_value = "10s", value_parser = parse_duration_arg)]
    pub progress_interval: Duration,

    /// Path to config file (TOML or JSON). Defaults to ./vuload.toml or ./vuload.json
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Skip the console summary
    #[arg(long = "no-summary")]
    pub no_summary: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,
}
