//! Weather Dashboard CLI
//!
//! Searches a city against the aggregation API and prints the current reading,
//! statistics, trend, hourly chart and per-source comparison.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use weather_dashboard::dashboard::PanelKind;
use weather_dashboard::dashboard::render::{
    ComparisonView, CurrentWeather, DashboardView, Header, LOADING, StatsView,
};
use weather_dashboard::{
    AggregatorClient, CityName, Dashboard, DashboardConfig, PendingSearch, SearchOutcome,
    WeatherApi, WeatherReading, logging,
};

/// Weather Dashboard
#[derive(Parser)]
#[command(name = "weather-dashboard")]
#[command(author, version, long_about = None)]
#[command(about = "Real-time weather data from multiple sources")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the aggregation API
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Request timeout in seconds (no timeout by default)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search one city and print the whole dashboard once all panels loaded
    Show {
        /// City name
        city: String,

        /// Lookback window in hours
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=168))]
        hours: Option<u32>,
    },

    /// List the raw readings of the lookback window
    History {
        /// City name
        city: String,

        /// Lookback window in hours
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=168))]
        hours: Option<u32>,
    },
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let loaded = match &cli.config {
        Some(path) => DashboardConfig::load_from_path(Some(path.clone())),
        None => DashboardConfig::load(),
    };
    let mut config = loaded.context("Failed to load configuration")?;

    if let Some(base_url) = &cli.base_url {
        config.api.base_url.clone_from(base_url);
    }
    if let Some(timeout) = cli.timeout {
        config.api.timeout_seconds = Some(timeout);
    }
    config.apply_defaults();
    config.validate().context("Invalid command line override")?;

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(&config.logging, cli.verbose)?;

    info!("Using aggregation API at {}", config.api.base_url);
    let api: Arc<dyn WeatherApi> = Arc::new(AggregatorClient::new(&config.api)?);

    match cli.command {
        None => run_interactive(api, &config).await,
        Some(Commands::Show { city, hours }) => {
            let hours = hours.unwrap_or(config.defaults.lookback_hours);
            let mut dashboard = Dashboard::new(api, hours);
            dashboard.submit(&city).await;
            dashboard.settle().await;
            print!("{}", DashboardView(&dashboard));
            Ok(())
        }
        Some(Commands::History { city, hours }) => {
            let hours = hours.unwrap_or(config.defaults.lookback_hours);
            show_history(api.as_ref(), &city, hours).await;
            Ok(())
        }
    }
}

async fn show_history(api: &dyn WeatherApi, raw: &str, hours: u32) {
    let city = match CityName::parse(raw) {
        Ok(city) => city,
        Err(e) => {
            println!("{}", e.user_message());
            return;
        }
    };

    match api.get_history(city.as_str(), hours).await {
        Ok(readings) if readings.is_empty() => {
            println!("No history available for {city} in the last {hours} hours.");
        }
        Ok(readings) => {
            println!("{city}: {} readings in the last {hours} hours", readings.len());
            for reading in &readings {
                println!("  {}", reading.format_line());
            }
        }
        Err(e) => {
            warn!("History for '{}' failed: {}", city, e);
            println!("Error loading history");
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Read one line, decoding invalid UTF-8 lossily. `None` at end of input.
///
/// Cancel safe as long as `buf` is kept between calls: bytes of a partly
/// read line stay in `buf` and the next call continues the same line.
async fn read_line<R>(reader: &mut R, buf: &mut Vec<u8>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let read = reader.read_until(b'\n', buf).await?;
    if read == 0 && buf.is_empty() {
        return Ok(None);
    }
    if std::str::from_utf8(buf).is_err() {
        warn!("Input line is not valid UTF-8; undecodable bytes replaced");
    }
    let line = String::from_utf8_lossy(buf)
        .trim_end_matches(['\r', '\n'])
        .to_string();
    buf.clear();
    Ok(Some(line))
}

/// Wait for the search in flight, or forever when there is none.
async fn wait_search(
    search: &mut Option<PendingSearch>,
) -> weather_dashboard::Result<WeatherReading> {
    match search {
        Some(search) => search.wait().await,
        None => std::future::pending().await,
    }
}

fn print_search_outcome(dashboard: &Dashboard, outcome: SearchOutcome) {
    match outcome {
        SearchOutcome::Loaded if dashboard.shows_panels() => {
            if let Some(reading) = dashboard.weather() {
                print!("\n{}", CurrentWeather(reading));
            }
            if !dashboard.is_settled() {
                println!("{LOADING}");
            }
        }
        SearchOutcome::Loaded => println!("No current data for that city."),
        SearchOutcome::Rejected | SearchOutcome::Failed => {
            if let Some(error) = dashboard.error() {
                println!("{error}");
            }
        }
    }
}

/// Read one city per line; print the reading and each panel as soon as they
/// arrive. Input is read while requests are in flight, and a new search
/// replaces one still pending. `quit`/`exit` leaves at once; end of input
/// leaves once outstanding work has been printed.
async fn run_interactive(api: Arc<dyn WeatherApi>, config: &DashboardConfig) -> Result<()> {
    let mut dashboard = Dashboard::new(api, config.defaults.lookback_hours);
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    let mut input_open = true;
    let mut search: Option<PendingSearch> = None;

    print!("{}", Header);
    println!(
        "Type a city (e.g. {}) and press Enter. 'quit' exits.",
        config.defaults.city
    );
    prompt();

    loop {
        if !input_open && search.is_none() && dashboard.is_settled() {
            break;
        }

        tokio::select! {
            line = read_line(&mut reader, &mut buf), if input_open => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    input_open = false;
                    continue;
                };
                if matches!(line.trim(), "quit" | "exit") {
                    break;
                }
                match dashboard.begin_search(&line) {
                    Some(pending) => {
                        println!("{LOADING}");
                        search = Some(pending);
                    }
                    None => {
                        print_search_outcome(&dashboard, SearchOutcome::Rejected);
                        if search.is_none() && dashboard.is_settled() {
                            prompt();
                        }
                    }
                }
            }
            result = wait_search(&mut search) => {
                if let Some(pending) = search.take() {
                    let outcome = dashboard.finish_search(pending, result);
                    print_search_outcome(&dashboard, outcome);
                    if dashboard.is_settled() {
                        prompt();
                    }
                }
            }
            Some(kind) = dashboard.next_update(), if !dashboard.is_settled() => {
                println!();
                match kind {
                    PanelKind::Statistics => print!("{}", StatsView(dashboard.stats_panel())),
                    PanelKind::Comparison => {
                        print!("{}", ComparisonView(dashboard.comparison_panel()));
                    }
                }
                if search.is_none() && dashboard.is_settled() {
                    prompt();
                }
            }
        }
    }

    Ok(())
}
