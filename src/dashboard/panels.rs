//! Derived-data panels and the controllers that load them
//!
//! Each panel loads independently and never surfaces an error: a failed fetch
//! is logged and the panel falls back to its "no data" rendering.

use tracing::{debug, error};

use crate::api::WeatherApi;
use crate::models::{ChartSeries, HourlyPoint, SourceComparison, StatisticsSummary, TrendResult};

/// Lifecycle of one panel for the current city
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelStatus {
    /// No city dispatched yet
    #[default]
    Idle,
    Loading,
    Ready,
    /// Fetch failed; rendered like `Ready` with whatever data arrived
    Failed,
}

impl PanelStatus {
    #[must_use]
    pub fn is_loading(self) -> bool {
        self == PanelStatus::Loading
    }
}

/// Statistics, trend and hourly chart for one city
#[derive(Debug, Clone, Default)]
pub struct StatsPanel {
    pub status: PanelStatus,
    pub hours: u32,
    pub statistics: Option<StatisticsSummary>,
    pub trend: Option<TrendResult>,
    pub hourly: Vec<HourlyPoint>,
}

impl StatsPanel {
    pub(crate) fn start_loading(&mut self, hours: u32) {
        *self = Self {
            status: PanelStatus::Loading,
            hours,
            ..Self::default()
        };
    }

    pub(crate) fn apply(&mut self, outcome: StatsOutcome) {
        self.status = if outcome.failed {
            PanelStatus::Failed
        } else {
            PanelStatus::Ready
        };
        self.statistics = outcome.statistics;
        self.trend = outcome.trend;
        self.hourly = outcome.hourly;
    }

    /// Line-chart series for the hourly data, in API order
    #[must_use]
    pub fn chart(&self) -> ChartSeries {
        ChartSeries::from_hourly(&self.hourly)
    }
}

/// Per-source comparison table for one city
#[derive(Debug, Clone, Default)]
pub struct ComparisonPanel {
    pub status: PanelStatus,
    pub comparison: Option<SourceComparison>,
}

impl ComparisonPanel {
    pub(crate) fn start_loading(&mut self) {
        *self = Self {
            status: PanelStatus::Loading,
            comparison: None,
        };
    }

    pub(crate) fn apply(&mut self, outcome: ComparisonOutcome) {
        self.status = if outcome.failed {
            PanelStatus::Failed
        } else {
            PanelStatus::Ready
        };
        self.comparison = outcome.comparison;
    }
}

/// Result of the statistics controller. Fields fetched before a failure are kept.
#[derive(Debug, Clone, Default)]
pub struct StatsOutcome {
    pub statistics: Option<StatisticsSummary>,
    pub trend: Option<TrendResult>,
    pub hourly: Vec<HourlyPoint>,
    pub failed: bool,
}

/// Result of the comparison controller
#[derive(Debug, Clone, Default)]
pub struct ComparisonOutcome {
    pub comparison: Option<SourceComparison>,
    pub failed: bool,
}

/// Fetch statistics, then trend, then hourly data. Stops at the first failure.
pub async fn load_statistics(api: &dyn WeatherApi, city: &str, hours: u32) -> StatsOutcome {
    let mut outcome = StatsOutcome::default();

    match api.get_stats(city, hours).await {
        Ok(statistics) => outcome.statistics = statistics,
        Err(e) => return failed_stats(outcome, city, &e),
    }

    match api.get_trend(city, hours).await {
        Ok(trend) => outcome.trend = trend,
        Err(e) => return failed_stats(outcome, city, &e),
    }

    match api.get_hourly(city, hours).await {
        Ok(hourly) => outcome.hourly = hourly,
        Err(e) => return failed_stats(outcome, city, &e),
    }

    debug!(
        "Statistics panel loaded for '{}' ({} hourly points)",
        city,
        outcome.hourly.len()
    );
    outcome
}

fn failed_stats(
    mut outcome: StatsOutcome,
    city: &str,
    err: &crate::DashboardError,
) -> StatsOutcome {
    error!("Error fetching stats for '{}': {}", city, err);
    outcome.failed = true;
    outcome
}

/// Fetch the per-source comparison
pub async fn load_comparison(api: &dyn WeatherApi, city: &str, hours: u32) -> ComparisonOutcome {
    match api.compare_sources(city, hours).await {
        Ok(comparison) => {
            debug!(
                "Comparison panel loaded for '{}' ({} sources)",
                city,
                comparison.rows().len()
            );
            ComparisonOutcome {
                comparison: Some(comparison),
                failed: false,
            }
        }
        Err(e) => {
            error!("Error fetching comparison for '{}': {}", city, e);
            ComparisonOutcome {
                comparison: None,
                failed: true,
            }
        }
    }
}
