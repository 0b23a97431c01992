//! Hourly average temperatures and the chart series built from them

use serde::{Deserialize, Deserializer, Serialize};

/// Average temperature of one hour in the lookback window
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HourlyPoint {
    /// Hour label exactly as sent by the API ("00", "2024-01-15T13:00", 13, ...)
    #[serde(deserialize_with = "label_from_string_or_number")]
    pub hour: String,
    #[serde(default)]
    pub avg_temperature: Option<f64>,
}

fn label_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Label {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Label::deserialize(deserializer)? {
        Label::Text(text) => text,
        Label::Number(number) => number.to_string(),
    })
}

/// One plotted point: hour label on x, temperature on y. A missing
/// temperature leaves a gap in the line.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub x: String,
    pub y: Option<f64>,
}

/// Line-chart series of temperature against hour, in API order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartSeries {
    pub name: &'static str,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    #[must_use]
    pub fn from_hourly(hourly: &[HourlyPoint]) -> Self {
        Self {
            name: "Temperature",
            points: hourly
                .iter()
                .map(|point| ChartPoint {
                    x: point.hour.clone(),
                    y: point.avg_temperature,
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Lowest and highest plotted temperature, ignoring gaps
    #[must_use]
    pub fn y_range(&self) -> Option<(f64, f64)> {
        self.points
            .iter()
            .filter_map(|p| p.y)
            .filter(|y| y.is_finite())
            .fold(None, |range, y| match range {
                None => Some((y, y)),
                Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
            })
    }
}
