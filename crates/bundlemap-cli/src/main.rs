//! bundlemap CLI - render bundle relation diagrams from a metadata snapshot

mod cli;

use bundlemap::core::logging::init_logging;
use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Environment variables take precedence over CLI flags
    let log_level = std::env::var(bundlemap::LOG_LEVEL_ENV)
        .ok()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| cli_args.log_level.as_str().to_string());
    let log_format = std::env::var(bundlemap::LOG_FORMAT_ENV)
        .ok()
        .unwrap_or_else(|| cli_args.log_format.as_str().to_string());

    if let Err(e) = init_logging(Some(&log_level), Some(&log_format)) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let app = cli::BundlemapApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
