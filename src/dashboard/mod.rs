//! Dashboard state and the search flow
//!
//! [`Dashboard`] owns every piece of view state: the search input, the current
//! reading, the loading flag, the user-visible error and the two derived-data
//! panels. Panel loads run as spawned tasks and report back over a channel;
//! every city dispatch starts a new generation, and messages from an older
//! generation are dropped so a slow answer for a previous city can never
//! overwrite the panels of the current one.

pub mod panels;
pub mod render;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::WeatherApi;
use crate::city::CityName;
use crate::models::WeatherReading;
use crate::{DashboardError, Result};

pub use panels::{ComparisonOutcome, ComparisonPanel, PanelStatus, StatsOutcome, StatsPanel};

/// Generic message shown for any failure of the current-weather search
pub const SEARCH_FAILED_MESSAGE: &str = "Error loading weather";

/// What a submit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Input was blank; nothing was requested
    Rejected,
    /// The current-weather request failed
    Failed,
    /// A reading was stored
    Loaded,
}

/// Which panel an applied message updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Statistics,
    Comparison,
}

#[derive(Debug)]
pub enum PanelUpdate {
    Statistics(StatsOutcome),
    Comparison(ComparisonOutcome),
}

/// A panel result tagged with the generation of the dispatch that produced it
#[derive(Debug)]
pub struct PanelMessage {
    pub generation: u64,
    pub update: PanelUpdate,
}

/// A current-weather fetch in flight. Dropping it cancels the request.
pub struct PendingSearch {
    city: CityName,
    task: JoinHandle<Result<WeatherReading>>,
}

impl PendingSearch {
    #[must_use]
    pub fn city(&self) -> &CityName {
        &self.city
    }

    /// Wait for the response. Cancel safe: it can be polled again after being
    /// dropped from a `select!`.
    pub async fn wait(&mut self) -> Result<WeatherReading> {
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) => Err(DashboardError::network(format!("Search task failed: {e}"))),
        }
    }
}

impl Drop for PendingSearch {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct Dashboard {
    api: Arc<dyn WeatherApi>,
    hours: u32,
    city_input: String,
    weather: Option<WeatherReading>,
    fetched_at: Option<DateTime<Local>>,
    loading: bool,
    error: Option<String>,
    panel_city: Option<CityName>,
    stats: StatsPanel,
    comparison: ComparisonPanel,
    generation: u64,
    tasks: Vec<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<PanelMessage>,
    rx: mpsc::UnboundedReceiver<PanelMessage>,
}

impl Dashboard {
    pub fn new(api: Arc<dyn WeatherApi>, hours: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api,
            hours,
            city_input: String::new(),
            weather: None,
            fetched_at: None,
            loading: false,
            error: None,
            panel_city: None,
            stats: StatsPanel::default(),
            comparison: ComparisonPanel::default(),
            generation: 0,
            tasks: Vec::new(),
            tx,
            rx,
        }
    }

    /// Run one search: normalize the input, fetch the current reading and,
    /// when the city changed, dispatch it to the panels.
    pub async fn submit(&mut self, raw: &str) -> SearchOutcome {
        let Some(mut search) = self.begin_search(raw) else {
            return SearchOutcome::Rejected;
        };
        let result = search.wait().await;
        self.finish_search(search, result)
    }

    /// Normalize the input and start the current-weather fetch in the
    /// background. Returns `None` when the input was rejected.
    ///
    /// The caller drives the returned search to completion and hands the
    /// result to [`Dashboard::finish_search`], so input stays responsive
    /// while the request is in flight.
    pub fn begin_search(&mut self, raw: &str) -> Option<PendingSearch> {
        self.city_input = raw.to_string();

        let city = match CityName::parse(raw) {
            Ok(city) => city,
            Err(e) => {
                self.error = Some(e.user_message());
                return None;
            }
        };

        self.loading = true;
        self.error = None;
        debug!("Searching current weather for '{}'", city);

        let api = Arc::clone(&self.api);
        let request_city = city.clone();
        let task = tokio::spawn(async move { api.get_weather(request_city.as_str()).await });
        Some(PendingSearch { city, task })
    }

    /// Store the result of a search started with [`Dashboard::begin_search`].
    pub fn finish_search(
        &mut self,
        search: PendingSearch,
        result: Result<WeatherReading>,
    ) -> SearchOutcome {
        self.loading = false;
        let city = search.city.clone();

        match result {
            Ok(reading) => {
                info!("Loaded current weather for '{}'", city);
                let key = if reading.city.trim().is_empty() {
                    city
                } else {
                    CityName::from_api(reading.city.as_str())
                };
                let has_data = reading.data.is_some();
                self.weather = Some(reading);
                self.fetched_at = Some(Local::now());

                if !has_data {
                    self.reset_panels();
                } else if self.panel_city.as_ref() != Some(&key) {
                    self.dispatch_city(key);
                }
                SearchOutcome::Loaded
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", city, e);
                self.error = Some(SEARCH_FAILED_MESSAGE.to_string());
                SearchOutcome::Failed
            }
        }
    }

    /// Start a new generation for `city` and spawn both panel loads.
    fn dispatch_city(&mut self, city: CityName) {
        self.abort_tasks();
        self.generation += 1;
        let generation = self.generation;
        debug!("Dispatching '{}' to panels (generation {})", city, generation);

        self.stats.start_loading(self.hours);
        self.comparison.start_loading();
        self.panel_city = Some(city.clone());

        let (api, tx, hours) = (Arc::clone(&self.api), self.tx.clone(), self.hours);
        let stats_city = city.clone();
        self.tasks.push(tokio::spawn(async move {
            let outcome = panels::load_statistics(api.as_ref(), stats_city.as_str(), hours).await;
            let _ = tx.send(PanelMessage {
                generation,
                update: PanelUpdate::Statistics(outcome),
            });
        }));

        let (api, tx) = (Arc::clone(&self.api), self.tx.clone());
        self.tasks.push(tokio::spawn(async move {
            let outcome = panels::load_comparison(api.as_ref(), city.as_str(), hours).await;
            let _ = tx.send(PanelMessage {
                generation,
                update: PanelUpdate::Comparison(outcome),
            });
        }));
    }

    /// Hide the panels and forget their city; in-flight loads become stale.
    fn reset_panels(&mut self) {
        self.abort_tasks();
        self.generation += 1;
        self.panel_city = None;
        self.stats = StatsPanel::default();
        self.comparison = ComparisonPanel::default();
    }

    fn abort_tasks(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    /// Apply a panel message. Returns the updated panel, or `None` when the
    /// message belongs to an older generation and was dropped.
    pub fn apply(&mut self, message: PanelMessage) -> Option<PanelKind> {
        if message.generation != self.generation {
            debug!(
                "Dropping stale panel update (generation {}, current {})",
                message.generation, self.generation
            );
            return None;
        }
        match message.update {
            PanelUpdate::Statistics(outcome) => {
                self.stats.apply(outcome);
                Some(PanelKind::Statistics)
            }
            PanelUpdate::Comparison(outcome) => {
                self.comparison.apply(outcome);
                Some(PanelKind::Comparison)
            }
        }
    }

    /// Wait for the next panel of the current generation to finish.
    /// Returns `None` right away when no panel is loading.
    pub async fn next_update(&mut self) -> Option<PanelKind> {
        while !self.is_settled() {
            let message = self.rx.recv().await?;
            if let Some(kind) = self.apply(message) {
                return Some(kind);
            }
        }
        None
    }

    /// Wait until both panels of the current generation are done.
    pub async fn settle(&mut self) {
        while self.next_update().await.is_some() {}
    }

    /// No panel is loading
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.stats.status.is_loading() && !self.comparison.status.is_loading()
    }

    /// Panels are shown only under a reading that carries data
    #[must_use]
    pub fn shows_panels(&self) -> bool {
        self.weather.as_ref().is_some_and(|w| w.data.is_some())
    }

    /// Raw text of the last submitted search
    #[must_use]
    pub fn city_input(&self) -> &str {
        &self.city_input
    }

    #[must_use]
    pub fn weather(&self) -> Option<&WeatherReading> {
        self.weather.as_ref()
    }

    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Local>> {
        self.fetched_at
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn panel_city(&self) -> Option<&str> {
        self.panel_city.as_ref().map(CityName::as_str)
    }

    #[must_use]
    pub fn stats_panel(&self) -> &StatsPanel {
        &self.stats
    }

    #[must_use]
    pub fn comparison_panel(&self) -> &ComparisonPanel {
        &self.comparison
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.abort_tasks();
    }
}
