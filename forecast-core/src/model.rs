use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Upper bound on the number of daily entries kept from a forecast response.
pub const MAX_FORECAST_DAYS: usize = 7;

/// Target of a forecast request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}, {:.2}", self.latitude, self.longitude)
    }
}

/// Most recent observation. Temperature is in °C, already rounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: i32,
    pub weather_code: i32,
    /// Local time as reported by the API, e.g. `2024-05-01T14:15`.
    pub observation_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub date: NaiveDate,
    pub max_temp: i32,
    pub min_temp: i32,
    pub weather_code: i32,
}

/// Normalized result of one forecast fetch.
///
/// Current conditions and the daily sequence always come from the same
/// response and are replaced together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Forecast {
    pub current: CurrentWeather,
    pub daily: Vec<DailyForecastEntry>,
}

/// Candidate place returned by a geocoding search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySuggestion {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub country: String,
    pub region: Option<String>,
}

impl CitySuggestion {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// "name, region, country", skipping empty or repeated parts.
    pub fn label(&self) -> String {
        let mut parts = vec![self.name.as_str()];

        if let Some(region) = self
            .region
            .as_deref()
            .filter(|r| !r.is_empty() && *r != self.name)
        {
            parts.push(region);
        }

        if !self.country.is_empty() {
            parts.push(self.country.as_str());
        }

        parts.join(", ")
    }
}

impl std::fmt::Display for CitySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suggestion(name: &str, region: Option<&str>, country: &str) -> CitySuggestion {
        CitySuggestion {
            id: 1,
            name: name.to_string(),
            latitude: 51.67,
            longitude: 39.22,
            country: country.to_string(),
            region: region.map(str::to_string),
        }
    }

    #[test]
    fn label_includes_region_and_country() {
        let s = suggestion("Voronezh", Some("Voronezh Oblast"), "Russia");
        assert_eq!(s.label(), "Voronezh, Voronezh Oblast, Russia");
    }

    #[test]
    fn label_skips_missing_and_duplicate_region() {
        assert_eq!(suggestion("Moscow", None, "Russia").label(), "Moscow, Russia");
        assert_eq!(suggestion("Moscow", Some("Moscow"), "Russia").label(), "Moscow, Russia");
        assert_eq!(suggestion("Atlantis", Some(""), "").label(), "Atlantis");
    }

    #[test]
    fn suggestion_coordinates() {
        let s = suggestion("Voronezh", None, "Russia");
        assert_eq!(s.coordinates(), Coordinates::new(51.67, 39.22));
    }
}
