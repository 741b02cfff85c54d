//! Scripted [`WeatherSource`] for unit tests.
//!
//! Replies are queued in call order. Gated replies resolve only when the
//! test sends on the returned channel, which lets tests choose the order in
//! which concurrent requests complete.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::{collections::VecDeque, sync::Mutex};
use tokio::sync::oneshot;

use crate::{
    WeatherError,
    model::{CitySuggestion, Coordinates, CurrentWeather, DailyForecastEntry, Forecast},
    provider::WeatherSource,
};

type Reply<T> = Result<T, WeatherError>;

#[derive(Debug)]
enum Queued<T> {
    Ready(Reply<T>),
    Gated(oneshot::Receiver<Reply<T>>),
}

impl<T> Queued<T> {
    async fn resolve(self) -> Reply<T> {
        match self {
            Self::Ready(reply) => reply,
            Self::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(WeatherError::Network("reply dropped".into()))),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    forecasts: Mutex<VecDeque<Queued<Forecast>>>,
    searches: Mutex<VecDeque<Queued<Vec<CitySuggestion>>>>,
    forecast_calls: Mutex<Vec<Coordinates>>,
    search_calls: Mutex<Vec<(String, usize)>>,
}

impl FakeSource {
    pub fn push_forecast(&self, reply: Reply<Forecast>) {
        self.forecasts.lock().unwrap().push_back(Queued::Ready(reply));
    }

    pub fn gate_forecast(&self) -> oneshot::Sender<Reply<Forecast>> {
        let (tx, rx) = oneshot::channel();
        self.forecasts.lock().unwrap().push_back(Queued::Gated(rx));
        tx
    }

    pub fn push_search(&self, reply: Reply<Vec<CitySuggestion>>) {
        self.searches.lock().unwrap().push_back(Queued::Ready(reply));
    }

    pub fn gate_search(&self) -> oneshot::Sender<Reply<Vec<CitySuggestion>>> {
        let (tx, rx) = oneshot::channel();
        self.searches.lock().unwrap().push_back(Queued::Gated(rx));
        tx
    }

    pub fn forecast_calls(&self) -> Vec<Coordinates> {
        self.forecast_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<(String, usize)> {
        self.search_calls.lock().unwrap().clone()
    }

    /// Forecast with a recognizable current temperature and `days` entries.
    pub fn forecast(temperature: i32, days: usize) -> Forecast {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        Forecast {
            current: CurrentWeather {
                temperature,
                weather_code: 0,
                observation_time: "2024-05-01T12:00".to_string(),
            },
            daily: start
                .iter_days()
                .take(days)
                .map(|date| DailyForecastEntry {
                    date,
                    max_temp: temperature + 5,
                    min_temp: temperature - 5,
                    weather_code: 3,
                })
                .collect(),
        }
    }

    pub fn city(id: i64, name: &str, latitude: f64, longitude: f64) -> CitySuggestion {
        CitySuggestion {
            id,
            name: name.to_string(),
            latitude,
            longitude,
            country: "Russia".to_string(),
            region: None,
        }
    }
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn fetch_forecast(&self, coordinates: Coordinates) -> Result<Forecast, WeatherError> {
        self.forecast_calls.lock().unwrap().push(coordinates);
        let next = self.forecasts.lock().unwrap().pop_front();
        match next {
            Some(queued) => queued.resolve().await,
            None => Err(WeatherError::Network("no forecast reply queued".into())),
        }
    }

    async fn search_cities(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<CitySuggestion>, WeatherError> {
        self.search_calls
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));
        let next = self.searches.lock().unwrap().pop_front();
        match next {
            Some(queued) => queued.resolve().await,
            None => Err(WeatherError::Network("no search reply queued".into())),
        }
    }
}
