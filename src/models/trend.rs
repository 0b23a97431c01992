//! Temperature trend over the lookback window

use std::fmt;

use serde::{Deserialize, Serialize};

use super::format_number;

/// Direction of the temperature trend as classified by the backend
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Warming,
    Cooling,
    Stable,
    #[serde(other)]
    Unknown,
}

impl TrendDirection {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TrendDirection::Warming => "🔥 Warming",
            TrendDirection::Cooling => "❄️ Cooling",
            TrendDirection::Stable => "➡️ Stable",
            TrendDirection::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categorical trend plus the signed temperature delta
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TrendResult {
    pub trend: TrendDirection,
    #[serde(default)]
    pub change: Option<f64>,
}

impl TrendResult {
    /// Signed change with unit. Only strictly positive values get a `+`.
    #[must_use]
    pub fn format_change(&self) -> String {
        let sign = match self.change {
            Some(change) if change > 0.0 => "+",
            _ => "",
        };
        format!("{sign}{}°C", format_number(self.change))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn trend(value: serde_json::Value) -> TrendResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_cooling_trend() {
        let result = trend(serde_json::json!({ "trend": "cooling", "change": -2.5 }));
        assert_eq!(result.trend, TrendDirection::Cooling);
        assert_eq!(result.trend.label(), "❄️ Cooling");
        assert_eq!(result.format_change(), "-2.5°C");
    }

    #[rstest]
    #[case(1.5, "+1.5°C")]
    #[case(0.0, "0°C")]
    #[case(-0.1, "-0.1°C")]
    #[case(3.0, "+3°C")]
    fn test_change_sign(#[case] change: f64, #[case] expected: &str) {
        let result = TrendResult {
            trend: TrendDirection::Stable,
            change: Some(change),
        };
        assert_eq!(result.format_change(), expected);
    }

    #[rstest]
    #[case("warming", TrendDirection::Warming)]
    #[case("cooling", TrendDirection::Cooling)]
    #[case("stable", TrendDirection::Stable)]
    #[case("insufficient_data", TrendDirection::Unknown)]
    fn test_trend_parsing(#[case] raw: &str, #[case] expected: TrendDirection) {
        let result = trend(serde_json::json!({ "trend": raw, "change": 0 }));
        assert_eq!(result.trend, expected);
    }

    #[test]
    fn test_missing_change() {
        let result = trend(serde_json::json!({ "trend": "stable" }));
        assert_eq!(result.format_change(), "N/A°C");
    }
}
