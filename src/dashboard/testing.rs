//! In-memory `WeatherApi` used by the dashboard tests

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::api::WeatherApi;
use crate::models::{
    HistoryReading, HourlyPoint, Observation, SourceComparison, SourceSummary, StatisticsSummary,
    TrendDirection, TrendResult, WeatherReading,
};
use crate::{DashboardError, Result};

#[derive(Default)]
pub struct FakeApi {
    calls: Mutex<Vec<String>>,
    failing: HashSet<&'static str>,
    failing_cities: HashSet<String>,
    delays: HashMap<String, Duration>,
    without_data: bool,
}

impl FakeApi {
    pub fn healthy() -> Self {
        Self::default()
    }

    /// Make one operation ("weather", "stats", "trend", "hourly", "compare", "history") fail
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Make every operation fail for one city
    pub fn failing_city(mut self, city: &str) -> Self {
        self.failing_cities.insert(city.to_string());
        self
    }

    /// Delay the derived-data answers for one city
    pub fn slow_for(mut self, city: &str, delay: Duration) -> Self {
        self.delays.insert(city.to_string(), delay);
        self
    }

    /// Current readings come back without a `data` block
    pub fn without_data(mut self) -> Self {
        self.without_data = true;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    async fn record(&self, operation: &'static str, city: &str, hours: Option<u32>) -> Result<()> {
        let entry = match hours {
            Some(hours) => format!("{operation}:{city}:{hours}"),
            None => format!("{operation}:{city}"),
        };
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(entry);
        }
        if hours.is_some() {
            if let Some(delay) = self.delays.get(city) {
                tokio::time::sleep(*delay).await;
            }
        }
        if self.failing.contains(operation) || self.failing_cities.contains(city) {
            return Err(DashboardError::http(500, format!("{operation} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl WeatherApi for FakeApi {
    async fn get_weather(&self, city: &str) -> Result<WeatherReading> {
        self.record("weather", city, None).await?;
        Ok(WeatherReading {
            city: city.to_string(),
            source: "fake".to_string(),
            data: (!self.without_data).then(|| Observation {
                temperature: Some(4.5),
                humidity: Some(80.0),
                wind_speed: None,
                pressure: Some(1012.0),
                weather: Some("overcast".to_string()),
            }),
        })
    }

    async fn get_history(&self, city: &str, hours: u32) -> Result<Vec<HistoryReading>> {
        self.record("history", city, Some(hours)).await?;
        Ok(vec![HistoryReading {
            source: Some("fake".to_string()),
            temperature: Some(4.0),
            ..HistoryReading::default()
        }])
    }

    async fn get_stats(&self, city: &str, hours: u32) -> Result<Option<StatisticsSummary>> {
        self.record("stats", city, Some(hours)).await?;
        Ok(Some(StatisticsSummary {
            min_temperature: Some(1.0),
            max_temperature: Some(6.0),
            avg_temperature: Some(3.5),
            observation_count: Some(city.len() as u64),
        }))
    }

    async fn get_trend(&self, city: &str, hours: u32) -> Result<Option<TrendResult>> {
        self.record("trend", city, Some(hours)).await?;
        Ok(Some(TrendResult {
            trend: TrendDirection::Cooling,
            change: Some(-2.5),
        }))
    }

    async fn compare_sources(&self, city: &str, hours: u32) -> Result<SourceComparison> {
        self.record("compare", city, Some(hours)).await?;
        Ok([(
            format!("source-{city}"),
            SourceSummary {
                count: Some(3),
                avg_temperature: Some(3.5),
                min_temperature: Some(1.0),
                max_temperature: Some(6.0),
            },
        )]
        .into_iter()
        .collect())
    }

    async fn get_hourly(&self, city: &str, hours: u32) -> Result<Vec<HourlyPoint>> {
        self.record("hourly", city, Some(hours)).await?;
        Ok(vec![
            HourlyPoint {
                hour: "00".to_string(),
                avg_temperature: Some(5.0),
            },
            HourlyPoint {
                hour: "01".to_string(),
                avg_temperature: Some(6.0),
            },
        ])
    }
}
