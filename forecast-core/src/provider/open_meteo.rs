use anyhow::Context;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    WeatherError,
    model::{
        CitySuggestion, Coordinates, CurrentWeather, DailyForecastEntry, Forecast,
        MAX_FORECAST_DAYS,
    },
};

use super::WeatherSource;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const REQUEST_TIMEOUT_SECS: u64 = 10;
const USER_AGENT: &str = concat!("forecast/", env!("CARGO_PKG_VERSION"));

const CURRENT_FIELDS: &str = "temperature_2m,weather_code";
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weather_code";

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoding_url: String,
    forecast_url: String,
    language: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(
        geocoding_url: String,
        forecast_url: String,
        language: String,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            geocoding_url,
            forecast_url,
            language,
            http,
        })
    }

    async fn get_body(&self, url: &str, query: &[(&str, String)]) -> Result<String, WeatherError> {
        debug!(url, ?query, "Open-Meteo request");

        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(%status, "Open-Meteo request failed");
            return Err(WeatherError::Network(format!(
                "status {}: {}",
                status,
                truncate_body(&body)
            )));
        }

        Ok(body)
    }
}

#[async_trait]
impl WeatherSource for OpenMeteoProvider {
    async fn fetch_forecast(&self, coordinates: Coordinates) -> Result<Forecast, WeatherError> {
        let body = self
            .get_body(
                &self.forecast_url,
                &[
                    ("latitude", coordinates.latitude.to_string()),
                    ("longitude", coordinates.longitude.to_string()),
                    ("current", CURRENT_FIELDS.to_string()),
                    ("daily", DAILY_FIELDS.to_string()),
                    ("timezone", "auto".to_string()),
                ],
            )
            .await?;

        let forecast = parse_forecast(&body)?;
        debug!(%coordinates, days = forecast.daily.len(), "forecast fetched");
        Ok(forecast)
    }

    async fn search_cities(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<CitySuggestion>, WeatherError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WeatherError::InvalidQuery);
        }

        let body = self
            .get_body(
                &self.geocoding_url,
                &[
                    ("name", query.to_string()),
                    ("count", max_results.to_string()),
                    ("language", self.language.clone()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        let cities = parse_search(&body)?;
        debug!(query, found = cities.len(), "city search finished");
        Ok(cities)
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodingResponse {
    results: Option<Vec<OmPlace>>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    id: i64,
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
}

// Every field is optional so that presence can be checked explicitly:
// missing `current`/`daily` objects and daily arrays are hard errors,
// missing leaves fall back to defaults.
#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: Option<OmCurrent>,
    daily: Option<OmDaily>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: Option<String>,
    temperature_2m: Option<f64>,
    weather_code: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Option<Vec<Option<String>>>,
    temperature_2m_max: Option<Vec<Option<f64>>>,
    temperature_2m_min: Option<Vec<Option<f64>>>,
    weather_code: Option<Vec<Option<i32>>>,
}

fn parse_search(body: &str) -> Result<Vec<CitySuggestion>, WeatherError> {
    let parsed: OmGeocodingResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedResponse(format!("geocoding JSON: {e}")))?;

    Ok(parsed
        .results
        .unwrap_or_default()
        .into_iter()
        .map(|p| CitySuggestion {
            id: p.id,
            name: p.name,
            latitude: p.latitude,
            longitude: p.longitude,
            country: p.country.unwrap_or_default(),
            region: p.admin1,
        })
        .collect())
}

fn parse_forecast(body: &str) -> Result<Forecast, WeatherError> {
    let parsed: OmForecastResponse = serde_json::from_str(body)
        .map_err(|e| WeatherError::MalformedResponse(format!("forecast JSON: {e}")))?;

    let current = parsed.current.ok_or_else(|| missing("current"))?;
    let daily = parsed.daily.ok_or_else(|| missing("daily"))?;

    let times = daily.time.ok_or_else(|| missing("daily.time"))?;
    let max = daily
        .temperature_2m_max
        .ok_or_else(|| missing("daily.temperature_2m_max"))?;
    let min = daily
        .temperature_2m_min
        .ok_or_else(|| missing("daily.temperature_2m_min"))?;
    let codes = daily
        .weather_code
        .ok_or_else(|| missing("daily.weather_code"))?;

    let current = CurrentWeather {
        temperature: round_temp(current.temperature_2m),
        weather_code: current.weather_code.unwrap_or(0),
        observation_time: current
            .time
            .unwrap_or_else(|| Local::now().format("%Y-%m-%dT%H:%M").to_string()),
    };

    let daily = times
        .iter()
        .take(MAX_FORECAST_DAYS)
        .enumerate()
        .map(|(i, time)| {
            let date = match time {
                Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                    WeatherError::MalformedResponse(format!("daily.time[{i}] = {raw:?}: {e}"))
                })?,
                None => Local::now().date_naive(),
            };

            Ok(DailyForecastEntry {
                date,
                max_temp: round_temp(max.get(i).copied().flatten()),
                min_temp: round_temp(min.get(i).copied().flatten()),
                weather_code: codes.get(i).copied().flatten().unwrap_or(0),
            })
        })
        .collect::<Result<Vec<_>, WeatherError>>()?;

    Ok(Forecast { current, daily })
}

fn missing(field: &str) -> WeatherError {
    WeatherError::MalformedResponse(format!("missing `{field}`"))
}

fn round_temp(value: Option<f64>) -> i32 {
    value.unwrap_or(0.0).round() as i32
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
