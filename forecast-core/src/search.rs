//! Turns free-text city input into coordinates for the forecast store.

use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    Config, WeatherError,
    model::CitySuggestion,
    provider::WeatherSource,
    store::WeatherStore,
};

pub const NOT_FOUND_MESSAGE: &str = "No city found with that name";
pub const SEARCH_FAILED_MESSAGE: &str = "City search failed, please try again";

#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    /// Minimum trimmed input length, in characters, that triggers a search.
    pub min_query_len: usize,
    pub suggestion_count: usize,
    pub debounce: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SearchSettings {
    fn from(config: &Config) -> Self {
        Self {
            min_query_len: config.min_query_len,
            suggestion_count: config.suggestion_count,
            debounce: config.debounce(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub input: String,
    pub suggestions: Vec<CitySuggestion>,
    pub show_suggestions: bool,
    pub is_searching: bool,
    pub error: Option<String>,
    // Bumped on every input change; search results from older generations are dropped.
    generation: u64,
    // Generation the current suggestions were fetched for.
    results_generation: u64,
}

impl SearchState {
    fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// First suggestion, if it was fetched for the input as it stands now.
    fn current_first(&self) -> Option<&CitySuggestion> {
        if self.results_generation == self.generation {
            self.suggestions.first()
        } else {
            None
        }
    }

    fn clear_suggestions(&mut self) {
        self.suggestions.clear();
        self.show_suggestions = false;
        self.is_searching = false;
    }

    fn apply_results(&mut self, result: Result<Vec<CitySuggestion>, WeatherError>) {
        self.is_searching = false;
        match result {
            Ok(found) if found.is_empty() => {
                self.clear_suggestions();
                self.error = Some(NOT_FOUND_MESSAGE.to_string());
            }
            Ok(found) => {
                self.suggestions = found;
                self.show_suggestions = true;
                self.error = None;
            }
            Err(err) => {
                warn!(error = %err, "city search failed");
                self.clear_suggestions();
                self.error = Some(failure_message(&err).to_string());
            }
        }
    }
}

fn failure_message(err: &WeatherError) -> &'static str {
    if err.is_not_found() {
        NOT_FOUND_MESSAGE
    } else {
        SEARCH_FAILED_MESSAGE
    }
}

#[derive(Debug)]
pub struct SearchController<S: ?Sized> {
    source: Arc<S>,
    store: Arc<WeatherStore<S>>,
    settings: SearchSettings,
    state: watch::Sender<SearchState>,
}

impl<S: WeatherSource + ?Sized> SearchController<S> {
    pub fn new(source: Arc<S>, store: Arc<WeatherStore<S>>, settings: SearchSettings) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            source,
            store,
            settings,
            state,
        }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<WeatherStore<S>> {
        &self.store
    }

    pub fn snapshot(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    fn is_searchable(&self, text: &str) -> bool {
        text.trim().chars().count() >= self.settings.min_query_len
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.borrow().generation == generation
    }

    /// Record new input and, if it is long enough, refresh the suggestions.
    pub async fn set_input(&self, text: &str) {
        let searchable = self.is_searchable(text);

        let mut generation = 0;
        self.state.send_modify(|state| {
            state.input = text.to_string();
            generation = state.next_generation();
            if !searchable {
                state.clear_suggestions();
                state.error = None;
            }
        });

        if !searchable {
            return;
        }

        if !self.settings.debounce.is_zero() {
            tokio::time::sleep(self.settings.debounce).await;
            if !self.is_current(generation) {
                debug!(query = text, "input changed during debounce, skipping search");
                return;
            }
        }

        self.state.send_modify(|state| state.is_searching = true);

        let result = self
            .source
            .search_cities(text.trim(), self.settings.suggestion_count)
            .await;

        self.state.send_if_modified(|state| {
            if state.generation != generation {
                debug!(query = text, "discarding stale suggestions");
                return false;
            }
            state.apply_results(result);
            state.results_generation = generation;
            true
        });
    }

    /// Replace the input without searching, e.g. for one-shot lookups.
    pub fn replace_input(&self, text: &str) {
        self.state.send_modify(|state| {
            state.input = text.to_string();
            state.next_generation();
            state.clear_suggestions();
            state.error = None;
        });
    }

    /// Pick a suggestion and request its forecast.
    pub async fn select(&self, index: usize) -> Option<CitySuggestion> {
        let chosen = self.state.borrow().suggestions.get(index).cloned()?;
        self.resolve(&chosen).await;
        Some(chosen)
    }

    /// Resolve the current input: the first suggestion fetched for it if
    /// there is one, otherwise a single-result lookup of the input text.
    pub async fn submit(&self) -> Option<CitySuggestion> {
        let (first, input) = {
            let state = self.state.borrow();
            (state.current_first().cloned(), state.input.clone())
        };

        if let Some(city) = first {
            self.resolve(&city).await;
            return Some(city);
        }

        if !self.is_searchable(&input) {
            return None;
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = state.next_generation();
            state.is_searching = true;
        });

        match self.source.search_city(input.trim()).await {
            Ok(city) if self.is_current(generation) => {
                self.resolve(&city).await;
                Some(city)
            }
            Ok(_) => None,
            Err(err) => {
                self.state.send_if_modified(|state| {
                    if state.generation != generation {
                        return false;
                    }
                    warn!(query = %input, error = %err, "city lookup failed");
                    state.clear_suggestions();
                    state.error = Some(failure_message(&err).to_string());
                    true
                });
                None
            }
        }
    }

    async fn resolve(&self, city: &CitySuggestion) {
        debug!(city = %city, "city selected");
        self.state.send_modify(|state| {
            state.input = city.name.clone();
            state.next_generation();
            state.clear_suggestions();
            state.error = None;
        });
        self.store.request_forecast(city.coordinates()).await;
    }
}
