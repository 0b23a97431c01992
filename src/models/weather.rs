//! Current weather reading model and display methods

use serde::{Deserialize, Serialize};

use super::{format_number, null_as_default};

/// Most recent observation for a city, as returned by `/weather`
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct WeatherReading {
    /// City name as resolved by the API
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    /// Upstream provider the reading came from
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,
    /// Measurements; absent when the API had nothing for the city
    #[serde(default)]
    pub data: Option<Observation>,
}

/// Measurements of a single reading. Every field may be missing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Observation {
    /// Temperature in Celsius
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Relative humidity in percent
    #[serde(default)]
    pub humidity: Option<f64>,
    /// Wind speed in m/s
    #[serde(default)]
    pub wind_speed: Option<f64>,
    /// Atmospheric pressure in hPa
    #[serde(default)]
    pub pressure: Option<f64>,
    /// Human-readable description of weather conditions
    #[serde(default)]
    pub weather: Option<String>,
}

impl Observation {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", format_number(self.temperature))
    }

    #[must_use]
    pub fn format_humidity(&self) -> String {
        format!("{}%", format_number(self.humidity))
    }

    #[must_use]
    pub fn format_wind_speed(&self) -> String {
        format!("{} m/s", format_number(self.wind_speed))
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        format!("{} hPa", format_number(self.pressure))
    }

    #[must_use]
    pub fn format_condition(&self) -> String {
        match self.weather.as_deref() {
            Some(text) if !text.is_empty() => text.to_string(),
            _ => "N/A".to_string(),
        }
    }
}
