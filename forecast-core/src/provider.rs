use crate::{
    Config, WeatherError,
    model::{CitySuggestion, Coordinates, Forecast},
    provider::open_meteo::OpenMeteoProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

/// Outbound weather data: geocoding search plus forecast retrieval.
///
/// One call is one attempt; implementations never retry.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_forecast(&self, coordinates: Coordinates) -> Result<Forecast, WeatherError>;

    /// Zero matches is `Ok(vec![])`, not an error.
    async fn search_cities(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<CitySuggestion>, WeatherError>;

    /// Best-effort single-result lookup; zero matches becomes `NotFound`.
    async fn search_city(&self, query: &str) -> Result<CitySuggestion, WeatherError> {
        self.search_cities(query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::NotFound(query.trim().to_string()))
    }
}

/// Construct the Open-Meteo provider using endpoints and language from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<OpenMeteoProvider> {
    OpenMeteoProvider::new(
        config.geocoding_url.clone(),
        config.forecast_url.clone(),
        config.language.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::FakeSource;

    #[test]
    fn provider_from_default_config() {
        let cfg = Config::default();
        assert!(provider_from_config(&cfg).is_ok());
    }

    #[tokio::test]
    async fn search_city_takes_first_match() {
        let source = FakeSource::default();
        source.push_search(Ok(vec![
            FakeSource::city(1, "Voronezh", 51.67, 39.22),
            FakeSource::city(2, "Voronezh", 50.0, 30.0),
        ]));

        let city = source.search_city("Voronezh").await.expect("city");
        assert_eq!(city.id, 1);
    }

    #[tokio::test]
    async fn search_city_reports_not_found() {
        let source = FakeSource::default();
        source.push_search(Ok(vec![]));

        let err = source.search_city(" Atlantis ").await.unwrap_err();
        assert_eq!(err, WeatherError::NotFound("Atlantis".to_string()));
    }
}
