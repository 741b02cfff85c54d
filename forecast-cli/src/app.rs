use std::{sync::Arc, time::Duration};

use forecast_core::{
    CitySuggestion, Config, OpenMeteoProvider, SearchController, SearchSettings, WeatherStore,
    provider_from_config,
};

/// Search settings for a terminal session.
///
/// Prompt keystrokes and one-shot commands reach the controller one call at a
/// time, so searches run without a debounce.
fn search_settings(config: &Config) -> SearchSettings {
    SearchSettings {
        debounce: Duration::ZERO,
        ..SearchSettings::from(config)
    }
}

/// Wiring of the data client, forecast store and search controller.
#[derive(Debug)]
pub struct App {
    config: Config,
    source: Arc<OpenMeteoProvider>,
    store: Arc<WeatherStore<OpenMeteoProvider>>,
    search: SearchController<OpenMeteoProvider>,
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let source = Arc::new(provider_from_config(&config)?);
        let store = Arc::new(WeatherStore::new(Arc::clone(&source)));
        let search = SearchController::new(
            Arc::clone(&source),
            Arc::clone(&store),
            search_settings(&config),
        );

        Ok(Self {
            config,
            source,
            store,
            search,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &OpenMeteoProvider {
        &self.source
    }

    pub fn store(&self) -> &WeatherStore<OpenMeteoProvider> {
        &self.store
    }

    pub fn search(&self) -> &SearchController<OpenMeteoProvider> {
        &self.search
    }

    /// Resolve text accepted from a prompt.
    ///
    /// An exact suggestion label selects that suggestion; otherwise the input
    /// is submitted, which picks the first live suggestion or falls back to a
    /// single-result lookup.
    pub async fn resolve_input(&self, text: &str) -> Option<CitySuggestion> {
        let state = self.search.snapshot();

        if let Some(index) = state.suggestions.iter().position(|c| c.label() == text) {
            return self.search.select(index).await;
        }

        if state.input != text {
            self.search.replace_input(text);
        }
        self.search.submit().await
    }
}
