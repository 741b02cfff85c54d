//! Forecast state container.
//!
//! State changes only through [`WeatherState::apply`], a reducer over
//! [`WeatherEvent`]s. Each dispatched request carries a [`RequestToken`];
//! events for anything but the most recently issued token are dropped, so
//! a slow response can never overwrite the result of a newer request.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    model::{Coordinates, CurrentWeather, DailyForecastEntry, Forecast},
    provider::WeatherSource,
};

/// Identity of one dispatched forecast request. Strictly increasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherEvent {
    RequestStarted {
        token: RequestToken,
        coordinates: Coordinates,
    },
    RequestSucceeded {
        token: RequestToken,
        forecast: Forecast,
    },
    RequestFailed {
        token: RequestToken,
        message: String,
    },
}

impl WeatherEvent {
    pub fn token(&self) -> RequestToken {
        match self {
            Self::RequestStarted { token, .. }
            | Self::RequestSucceeded { token, .. }
            | Self::RequestFailed { token, .. } => *token,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherState {
    pub current: Option<CurrentWeather>,
    pub daily: Vec<DailyForecastEntry>,
    pub status: RequestStatus,
    /// Set only while `status` is `Failed`.
    pub error: Option<String>,
    /// Target of the latest dispatched request; used by retry.
    pub last_coordinates: Option<Coordinates>,
    latest: RequestToken,
}

impl WeatherState {
    /// Issue a token newer than every token issued before it.
    pub fn issue_token(&mut self) -> RequestToken {
        self.latest = RequestToken(self.latest.0 + 1);
        self.latest
    }

    pub fn latest_token(&self) -> RequestToken {
        self.latest
    }

    /// Apply an event. Returns `false` (and changes nothing) for stale events.
    pub fn apply(&mut self, event: WeatherEvent) -> bool {
        if event.token() != self.latest {
            debug!(
                token = event.token().0,
                latest = self.latest.0,
                "discarding stale forecast event"
            );
            return false;
        }

        match event {
            WeatherEvent::RequestStarted { coordinates, .. } => {
                self.status = RequestStatus::Loading;
                self.error = None;
                self.last_coordinates = Some(coordinates);
            }
            WeatherEvent::RequestSucceeded { forecast, .. } => {
                self.status = RequestStatus::Succeeded;
                self.current = Some(forecast.current);
                self.daily = forecast.daily;
                self.error = None;
            }
            WeatherEvent::RequestFailed { message, .. } => {
                // Previous data stays visible next to the error.
                self.status = RequestStatus::Failed;
                self.error = Some(message);
            }
        }

        true
    }
}

/// Drives forecast requests against a [`WeatherSource`] and publishes
/// every state change to subscribers.
#[derive(Debug)]
pub struct WeatherStore<S: ?Sized> {
    source: Arc<S>,
    state: watch::Sender<WeatherState>,
}

impl<S: WeatherSource + ?Sized> WeatherStore<S> {
    pub fn new(source: Arc<S>) -> Self {
        let (state, _) = watch::channel(WeatherState::default());
        Self { source, state }
    }

    pub fn snapshot(&self) -> WeatherState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.state.subscribe()
    }

    /// Fetch the forecast for `coordinates`.
    ///
    /// Returns `true` if this request's outcome landed in the state, `false`
    /// if a newer request superseded it while it was in flight.
    pub async fn request_forecast(&self, coordinates: Coordinates) -> bool {
        let mut token = RequestToken::default();
        self.state.send_modify(|state| {
            token = state.issue_token();
            state.apply(WeatherEvent::RequestStarted { token, coordinates });
        });

        info!(%coordinates, token = token.0, "requesting forecast");

        let event = match self.source.fetch_forecast(coordinates).await {
            Ok(forecast) => WeatherEvent::RequestSucceeded { token, forecast },
            Err(err) => {
                warn!(%coordinates, error = %err, "forecast request failed");
                WeatherEvent::RequestFailed {
                    token,
                    message: err.user_message(),
                }
            }
        };

        self.state.send_if_modified(|state| state.apply(event))
    }

    /// Repeat the latest request. Returns `false` if nothing was requested yet.
    pub async fn retry(&self) -> bool {
        let last = self.state.borrow().last_coordinates;
        match last {
            Some(coordinates) => {
                self.request_forecast(coordinates).await;
                true
            }
            None => false,
        }
    }
}
