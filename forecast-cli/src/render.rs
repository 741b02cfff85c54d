//! Terminal presentation of store and search state.
//!
//! Everything here is a pure function of a state snapshot.

use chrono::{Locale, NaiveDate, NaiveDateTime, NaiveTime};
use forecast_core::{
    CurrentWeather, DailyForecastEntry, Lang, RequestStatus, SearchState, WeatherState,
    classify_in,
};

const PLACEHOLDER: &str = "░";

pub fn weather(state: &WeatherState, lang: Lang) -> String {
    let mut out = String::new();

    match state.status {
        RequestStatus::Idle => out.push_str("No forecast requested yet.\n"),
        RequestStatus::Loading => out.push_str(&skeleton()),
        RequestStatus::Failed => {
            let message = state.error.as_deref().unwrap_or("Unknown error");
            out.push_str(&format!("✖ Error: {message}\n"));
            out.push_str("  Retry to request the forecast again.\n");

            if state.current.is_some() {
                out.push_str("\nLast known forecast:\n");
                out.push_str(&cards(state, lang));
            }
        }
        RequestStatus::Succeeded => out.push_str(&cards(state, lang)),
    }

    out
}

pub fn search(state: &SearchState) -> String {
    if let Some(error) = &state.error {
        return format!("{error}\n");
    }

    if state.is_searching {
        return "Searching...\n".to_string();
    }

    let mut out = String::new();
    if state.show_suggestions {
        for (i, city) in state.suggestions.iter().enumerate() {
            out.push_str(&format!(
                "{:>2}. {}  ({:.2}, {:.2})\n",
                i + 1,
                city.label(),
                city.latitude,
                city.longitude
            ));
        }
    }
    out
}

fn cards(state: &WeatherState, lang: Lang) -> String {
    let mut out = String::new();

    if let Some(current) = &state.current {
        out.push_str(&current_card(current, lang));
    }

    if !state.daily.is_empty() {
        out.push('\n');
        for day in &state.daily {
            out.push_str(&day_card(day, lang));
        }
    }

    out
}

fn current_card(current: &CurrentWeather, lang: Lang) -> String {
    let c = classify_in(current.weather_code, lang);
    format!(
        "Current weather\n  {}\n  {}  {}°C  {}\n",
        format_observation_time(&current.observation_time, lang),
        c.icon,
        current.temperature,
        c.description
    )
}

fn day_card(day: &DailyForecastEntry, lang: Lang) -> String {
    let c = classify_in(day.weather_code, lang);
    format!(
        "  {:<12} {}  {:>3}°C / {:>3}°C  {}\n",
        format_day(day.date, lang),
        c.icon,
        day.max_temp,
        day.min_temp,
        c.label
    )
}

fn skeleton() -> String {
    let bar = |n: usize| PLACEHOLDER.repeat(n);
    let mut out = format!(
        "Loading...\n\n  {}\n  {}  {}\n  {}\n\n",
        bar(16),
        bar(2),
        bar(6),
        bar(12)
    );
    for _ in 0..3 {
        out.push_str(&format!("  {}  {}  {}\n", bar(10), bar(2), bar(14)));
    }
    out
}

fn locale(lang: Lang) -> Locale {
    match lang {
        Lang::En => Locale::en_US,
        Lang::Ru => Locale::ru_RU,
    }
}

fn format_localized(time: NaiveDateTime, fmt: &str, lang: Lang) -> String {
    time.and_utc().format_localized(fmt, locale(lang)).to_string()
}

fn format_day(date: NaiveDate, lang: Lang) -> String {
    format_localized(date.and_time(NaiveTime::MIN), "%a, %-d %b", lang)
}

fn format_observation_time(raw: &str, lang: Lang) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map(|t| format_localized(t, "%-d %B %Y, %H:%M", lang))
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_core::CitySuggestion;

    fn succeeded_state() -> WeatherState {
        let mut state = WeatherState::default();
        state.current = Some(CurrentWeather {
            temperature: 15,
            weather_code: 2,
            observation_time: "2024-05-01T14:15".to_string(),
        });
        state.daily = vec![DailyForecastEntry {
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            max_temp: 20,
            min_temp: -3,
            weather_code: 61,
        }];
        state.status = RequestStatus::Succeeded;
        state
    }

    #[test]
    fn renders_cards() {
        let out = weather(&succeeded_state(), Lang::En);

        assert!(out.contains("15°C"));
        assert!(out.contains("Partly cloudy"));
        assert!(out.contains("1 May 2024, 14:15"));
        assert!(out.contains("Wed, 1 May"));
        assert!(out.contains("20°C /  -3°C"));
        assert!(out.contains("Rain"));
    }

    #[test]
    fn renders_skeleton_while_loading() {
        let mut state = succeeded_state();
        state.status = RequestStatus::Loading;
        let out = weather(&state, Lang::En);

        assert!(out.starts_with("Loading..."));
        assert!(out.contains(PLACEHOLDER));
        assert!(!out.contains("15°C"));
    }

    #[test]
    fn renders_error_with_stale_data() {
        let mut state = succeeded_state();
        state.status = RequestStatus::Failed;
        state.error = Some("Failed to fetch weather data (status 500)".to_string());
        let out = weather(&state, Lang::En);

        assert!(out.contains("status 500"));
        assert!(out.contains("Retry"));
        assert!(out.contains("Last known forecast"));
        assert!(out.contains("15°C"));
    }

    #[test]
    fn observation_time_falls_back_to_raw() {
        assert_eq!(format_observation_time("soon", Lang::En), "soon");
    }

    #[test]
    fn renders_cards_in_russian() {
        let out = weather(&succeeded_state(), Lang::Ru);

        assert!(out.contains("15°C"));
        assert!(out.contains("Частичная облачность"));
        assert!(out.contains("Дождь"));
        assert!(out.contains("Ср, 1"));
        assert!(out.contains("2024, 14:15"));
        assert!(!out.contains("Wed"));
        assert!(!out.contains("Partly cloudy"));
    }

    #[test]
    fn renders_search_states() {
        let mut state = SearchState::default();
        state.suggestions = vec![CitySuggestion {
            id: 1,
            name: "Voronezh".to_string(),
            latitude: 51.67,
            longitude: 39.22,
            country: "Russia".to_string(),
            region: None,
        }];
        state.show_suggestions = true;
        assert_eq!(search(&state), " 1. Voronezh, Russia  (51.67, 39.22)\n");

        state.error = Some("No city found with that name".to_string());
        assert_eq!(search(&state), "No city found with that name\n");
    }
}
