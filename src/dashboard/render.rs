//! Plain-text rendering of the dashboard
//!
//! Every view is a borrowed wrapper implementing `Display`, so the binary can
//! print the whole dashboard or a single panel as it settles.

use std::fmt;

use super::{ComparisonPanel, Dashboard, StatsPanel};
use crate::models::{ChartSeries, SourceComparison, TrendResult, WeatherReading, format_number};

pub const TITLE: &str = "🌤️ Weather Dashboard";
pub const SUBTITLE: &str = "Real-time weather data from multiple sources";
pub const LOADING: &str = "Loading...";
pub const NO_STATISTICS: &str = "No statistics available yet. Search for weather first!";
pub const NO_COMPARISON: &str = "No comparison data available yet.";

const COMPARISON_HEADERS: [&str; 5] = [
    "Source",
    "Observations",
    "Avg Temp (°C)",
    "Min Temp (°C)",
    "Max Temp (°C)",
];

/// Widest bar of the hourly chart, in characters
const BAR_WIDTH: usize = 30;

pub struct Header;

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{TITLE}")?;
        writeln!(f, "{SUBTITLE}")
    }
}

/// Current-weather card. Renders nothing when the reading has no data.
pub struct CurrentWeather<'a>(pub &'a WeatherReading);

impl fmt::Display for CurrentWeather<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reading = self.0;
        let Some(data) = reading.data.as_ref() else {
            return Ok(());
        };
        writeln!(f, "{}", reading.city)?;
        writeln!(f, "Data source: {}", reading.source)?;
        writeln!(f, "  Temperature:        {}", data.format_temperature())?;
        writeln!(f, "  Humidity:           {}", data.format_humidity())?;
        writeln!(f, "  Wind Speed:         {}", data.format_wind_speed())?;
        writeln!(f, "  Pressure:           {}", data.format_pressure())?;
        writeln!(f, "  Weather Condition:  {}", data.format_condition())
    }
}

/// Statistics, trend and hourly chart
pub struct StatsView<'a>(pub &'a StatsPanel);

impl fmt::Display for StatsView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let panel = self.0;
        if panel.status.is_loading() {
            return writeln!(f, "{LOADING}");
        }

        match panel.statistics.as_ref() {
            None => writeln!(f, "{NO_STATISTICS}")?,
            Some(stats) => {
                writeln!(f, "{}-Hour Statistics", panel.hours)?;
                writeln!(f, "  Min Temperature:      {}", stats.format_min())?;
                writeln!(f, "  Max Temperature:      {}", stats.format_max())?;
                writeln!(f, "  Average Temperature:  {}", stats.format_avg())?;
                writeln!(f, "  Observations:         {}", stats.format_count())?;
            }
        }

        if let Some(trend) = panel.trend.as_ref() {
            write!(f, "{}", TrendView(trend))?;
        }

        let chart = panel.chart();
        if !chart.is_empty() {
            write!(f, "{}", HourlyChart(&chart))?;
        }
        Ok(())
    }
}

pub struct TrendView<'a>(pub &'a TrendResult);

impl fmt::Display for TrendView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Temperature Trend")?;
        writeln!(f, "  Trend:   {}", self.0.trend)?;
        writeln!(f, "  Change:  {}", self.0.format_change())
    }
}

/// Horizontal bar per hour, scaled between the lowest and highest value
pub struct HourlyChart<'a>(pub &'a ChartSeries);

impl fmt::Display for HourlyChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let series = self.0;
        writeln!(f, "Hourly {}", series.name)?;
        let label_width = series
            .points
            .iter()
            .map(|p| p.x.chars().count())
            .max()
            .unwrap_or(0);
        let range = series.y_range();

        for point in &series.points {
            let bar = match (point.y, range) {
                (Some(y), Some((lo, hi))) if y.is_finite() => "█".repeat(bar_length(y, lo, hi)),
                _ => String::new(),
            };
            writeln!(
                f,
                "  {:<label_width$}  {:<BAR_WIDTH$}  {}°C",
                point.x,
                bar,
                format_number(point.y)
            )?;
        }
        Ok(())
    }
}

fn bar_length(y: f64, lo: f64, hi: f64) -> usize {
    if hi <= lo {
        return BAR_WIDTH;
    }
    let scaled = (y - lo) / (hi - lo) * (BAR_WIDTH - 1) as f64;
    1 + scaled.round().clamp(0.0, (BAR_WIDTH - 1) as f64) as usize
}

pub struct ComparisonView<'a>(pub &'a ComparisonPanel);

impl fmt::Display for ComparisonView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let panel = self.0;
        if panel.status.is_loading() {
            return writeln!(f, "{LOADING}");
        }
        match panel.comparison.as_ref() {
            Some(comparison) if !comparison.is_empty() => {
                write!(f, "{}", ComparisonTable(comparison))
            }
            _ => writeln!(f, "{NO_COMPARISON}"),
        }
    }
}

/// Column-aligned table, one row per source in response order
pub struct ComparisonTable<'a>(pub &'a SourceComparison);

impl fmt::Display for ComparisonTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows: Vec<[String; 5]> = self.0.rows().iter().map(|row| row.cells()).collect();

        let mut widths = COMPARISON_HEADERS.map(|h| h.chars().count());
        for cells in &rows {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        writeln!(f, "Data Source Comparison")?;
        write_row(f, &COMPARISON_HEADERS, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        write_row(f, &rule, &widths)?;
        for cells in &rows {
            write_row(f, cells, &widths)?;
        }
        Ok(())
    }
}

fn write_row<S: AsRef<str>>(
    f: &mut fmt::Formatter<'_>,
    cells: &[S],
    widths: &[usize],
) -> fmt::Result {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let cell = cell.as_ref();
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    writeln!(f, "  {}", line.join("  ").trim_end())
}

/// The whole dashboard: header, error line, current card and panels
pub struct DashboardView<'a>(pub &'a Dashboard);

impl fmt::Display for DashboardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dash = self.0;
        write!(f, "{}", Header)?;
        writeln!(f)?;

        let input = dash.city_input().trim();
        if !input.is_empty() {
            writeln!(f, "Search: {input}")?;
        }
        if dash.is_loading() {
            writeln!(f, "{LOADING}")?;
        }
        if let Some(error) = dash.error() {
            writeln!(f, "{error}")?;
        }

        let Some(reading) = dash.weather() else {
            return Ok(());
        };
        if !dash.shows_panels() {
            return Ok(());
        }

        write!(f, "{}", CurrentWeather(reading))?;
        if let Some(fetched_at) = dash.fetched_at() {
            writeln!(f, "  Updated:            {}", fetched_at.format("%H:%M:%S"))?;
        }
        writeln!(f)?;
        write!(f, "{}", StatsView(dash.stats_panel()))?;
        writeln!(f)?;
        write!(f, "{}", ComparisonView(dash.comparison_panel()))
    }
}
