//! Data models for the weather dashboard
//!
//! Read-only view models hydrated directly from the aggregation API:
//! - Weather: the current reading of a city
//! - Statistics / Trend / Hourly / Comparison: derived data over a lookback window
//! - History: raw readings of the lookback window

pub mod comparison;
pub mod history;
pub mod hourly;
pub mod statistics;
pub mod trend;
pub mod weather;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

pub use comparison::{SourceComparison, SourceRow, SourceSummary};
pub use history::HistoryReading;
pub use hourly::{ChartPoint, ChartSeries, HourlyPoint};
pub use statistics::StatisticsSummary;
pub use trend::{TrendDirection, TrendResult};
pub use weather::{Observation, WeatherReading};

/// Placeholder for values the API did not provide
pub const NOT_AVAILABLE: &str = "N/A";

/// Render an optional number the way the dashboard shows it: shortest natural
/// form (`5`, `5.5`, `-2.25`) or `N/A` when absent.
#[must_use]
pub fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Decode a field where an explicit `null` means the same as a missing value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode an optional count. Integral floats (`48.0`) are accepted since the
/// backend computes some counts in floating point.
pub(crate) fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Ok(Some(v as u64)),
        Some(v) => Err(D::Error::custom(format!("invalid count {v}"))),
    }
}
