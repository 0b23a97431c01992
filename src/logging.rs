//! Diagnostic logging setup
//!
//! Logs go to stderr so stdout carries only the dashboard.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::DashboardError;
use crate::config::LoggingConfig;

/// Filter directive for a `-v` count; `None` defers to the configured level
#[must_use]
pub const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Pick the filter directive: `RUST_LOG` wins, then `-v`, then the config.
fn build_filter(config: &LoggingConfig, verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = log_filter_from_verbosity(verbose).unwrap_or(config.level.as_str());
        EnvFilter::new(level)
    })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LoggingConfig, verbose: u8) -> crate::Result<()> {
    let filter = build_filter(config, verbose);
    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };

    result.map_err(|e| DashboardError::config(format!("Failed to initialize logging: {e}")))
}
