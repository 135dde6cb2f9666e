//! Logging setup for the graph pipeline
//!
//! Structured logging goes through `tracing`. Library code only emits
//! events and spans; binaries call [`init_logging`] once to install a
//! `tracing-subscriber` registry with an `EnvFilter` and a fmt layer.
//!
//! # Level and format resolution
//!
//! - level: explicit argument, then `BUNDLEMAP_LOG_LEVEL`, then `RUST_LOG`,
//!   then `info`. The value `off` silences everything.
//! - format: explicit argument, then `BUNDLEMAP_LOG_FORMAT`, then `compact`.
//!
//! # Filtering
//!
//! ```bash
//! # Per-field decisions of the graph builder
//! RUST_LOG="bundlemap::graph::builder=trace" bundlemap relations -m site.json
//!
//! # Everything at info, traversal at debug
//! RUST_LOG="info,bundlemap::graph::traversal=debug" bundlemap render -m site.json -s node/article
//! ```

use std::str::FromStr;

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Environment variable consulted for the log level
pub const LOG_LEVEL_ENV: &str = "BUNDLEMAP_LOG_LEVEL";

/// Environment variable consulted for the log format
pub const LOG_FORMAT_ENV: &str = "BUNDLEMAP_LOG_FORMAT";

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact single-line format
    Compact,
    /// Pretty multi-line format with colors
    Pretty,
    /// JSON format for log aggregation
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

fn resolve_filter(level: Option<&str>) -> EnvFilter {
    let log_level = level
        .map(|s| s.to_string())
        .or_else(|| std::env::var(LOG_LEVEL_ENV).ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    if log_level == "off" {
        return EnvFilter::new("off");
    }

    EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn resolve_format(format: Option<&str>) -> Result<LogFormat, String> {
    let log_format = format
        .map(|s| s.to_string())
        .or_else(|| std::env::var(LOG_FORMAT_ENV).ok())
        .unwrap_or_else(|| "compact".to_string());

    LogFormat::from_str(&log_format).map_err(|e| format!("Invalid log format: {}", e))
}

/// Install the global tracing subscriber
///
/// Logs go to stderr so that diagram text written to stdout stays clean.
/// Returns an error for an unknown format or when a subscriber is already
/// installed.
pub fn init_logging(
    level: Option<&str>,
    format: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = resolve_format(format)?;
    let filter = resolve_filter(level);

    match format {
        LogFormat::Compact => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .with_level(true)
                        .with_span_events(FmtSpan::NONE),
                )
                .try_init()?;
        }
        LogFormat::Pretty => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_span_events(FmtSpan::ACTIVE)
                        .pretty(),
                )
                .try_init()?;
        }
        LogFormat::Json => {
            Registry::default()
                .with(filter)
                .with(
                    fmt::Layer::default()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .json(),
                )
                .try_init()?;
        }
    }

    Ok(())
}

/// Initialize logging with default settings (info level, compact format)
pub fn init_default_logging() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(None, None)
}
