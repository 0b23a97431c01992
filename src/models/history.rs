//! Raw readings of the lookback window

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Observation, format_number};

/// One stored reading as returned by `/weather/history/{city}`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct HistoryReading {
    #[serde(default, alias = "recorded_at", alias = "time")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub weather: Option<String>,
}

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

impl HistoryReading {
    /// Timestamp as UTC. Naive timestamps are taken to be UTC already.
    #[must_use]
    pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    /// The measurement part of the reading
    #[must_use]
    pub fn observation(&self) -> Observation {
        Observation {
            temperature: self.temperature,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            pressure: self.pressure,
            weather: self.weather.clone(),
        }
    }

    /// Single listing line: time, source, temperature, humidity, wind, condition
    #[must_use]
    pub fn format_line(&self) -> String {
        let when = match (self.recorded_at(), self.timestamp.as_deref()) {
            (Some(dt), _) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => "unknown time".to_string(),
        };
        let observation = self.observation();
        format!(
            "{when}  [{}]  {}  {}%  {} m/s  {}",
            self.source.as_deref().unwrap_or("unknown source"),
            observation.format_temperature(),
            format_number(self.humidity),
            format_number(self.wind_speed),
            observation.format_condition(),
        )
    }
}
