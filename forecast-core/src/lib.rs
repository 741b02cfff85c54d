//! Core library for the `forecast` app.
//!
//! This crate defines:
//! - Shared domain models (coordinates, current weather, daily forecast, city suggestions)
//! - The weather code classifier used by every presentation surface
//! - The Open-Meteo data client behind the [`WeatherSource`] trait
//! - The forecast state store and the city search controller
//! - Configuration handling
//!
//! It is used by `forecast-cli`, but can also be reused by other front ends.

pub mod classify;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod search;
pub mod store;

#[cfg(test)]
mod fake;

pub use classify::{Classification, Lang, StyleCategory, classify, classify_in};
pub use config::{Config, HomeLocation};
pub use error::WeatherError;
pub use model::{CitySuggestion, Coordinates, CurrentWeather, DailyForecastEntry, Forecast};
pub use provider::{WeatherSource, open_meteo::OpenMeteoProvider, provider_from_config};
pub use search::{SearchController, SearchSettings, SearchState};
pub use store::{RequestStatus, WeatherState, WeatherStore};
