//! Aggregate statistics over the lookback window

use serde::{Deserialize, Serialize};

use super::{format_number, optional_count};

/// Min/max/avg temperature and observation count computed by the backend
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct StatisticsSummary {
    #[serde(default)]
    pub min_temperature: Option<f64>,
    #[serde(default)]
    pub max_temperature: Option<f64>,
    #[serde(default)]
    pub avg_temperature: Option<f64>,
    #[serde(default, deserialize_with = "optional_count")]
    pub observation_count: Option<u64>,
}

impl StatisticsSummary {
    #[must_use]
    pub fn format_min(&self) -> String {
        format!("{}°C", format_number(self.min_temperature))
    }

    #[must_use]
    pub fn format_max(&self) -> String {
        format!("{}°C", format_number(self.max_temperature))
    }

    #[must_use]
    pub fn format_avg(&self) -> String {
        format!("{}°C", format_number(self.avg_temperature))
    }

    #[must_use]
    pub fn format_count(&self) -> String {
        self.observation_count
            .map_or_else(|| super::NOT_AVAILABLE.to_string(), |c| c.to_string())
    }
}
