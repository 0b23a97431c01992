//! Weather Dashboard - terminal client for a multi-source weather aggregation API
//!
//! This library provides the API client, the data models, and the dashboard
//! state with its panel controllers and plain-text rendering.

pub mod api;
pub mod city;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod models;

// Re-export core types for public API
pub use api::{AggregatorClient, WeatherApi};
pub use city::CityName;
pub use config::DashboardConfig;
pub use dashboard::{Dashboard, PendingSearch, SearchOutcome};
pub use error::DashboardError;
pub use models::{
    HistoryReading, HourlyPoint, SourceComparison, StatisticsSummary, TrendResult, WeatherReading,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DashboardError>;
