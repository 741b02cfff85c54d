use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    classify::Lang,
    model::Coordinates,
    provider::open_meteo::{DEFAULT_FORECAST_URL, DEFAULT_GEOCODING_URL},
};

/// Location shown when no city is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomeLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl HomeLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl Default for HomeLocation {
    fn default() -> Self {
        Self {
            name: "Voronezh".to_string(),
            latitude: 51.67,
            longitude: 39.22,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// language = "en"
/// suggestion_count = 8
///
/// [home]
/// name = "Moscow"
/// latitude = 55.75
/// longitude = 37.62
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub geocoding_url: String,
    pub forecast_url: String,

    /// Language for geocoding results, e.g. "ru" or "en".
    pub language: String,

    /// How many suggestions a live search asks for.
    pub suggestion_count: usize,

    /// Inputs shorter than this (in characters) never trigger a search.
    pub min_query_len: usize,

    /// Quiet period after the last keystroke before a live search fires.
    pub debounce_ms: u64,

    pub home: HomeLocation,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
            language: "ru".to_string(),
            suggestion_count: 5,
            min_query_len: 3,
            debounce_ms: 300,
            home: HomeLocation::default(),
        }
    }
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Language for weather descriptions and dates, derived from `language`.
    pub fn lang(&self) -> Lang {
        Lang::from_code(&self.language)
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    fn validate(&self) -> Result<()> {
        if self.suggestion_count == 0 {
            return Err(anyhow!("suggestion_count must be at least 1"));
        }
        if self.min_query_len == 0 {
            return Err(anyhow!("min_query_len must be at least 1"));
        }
        if !(-90.0..=90.0).contains(&self.home.latitude)
            || !(-180.0..=180.0).contains(&self.home.longitude)
        {
            return Err(anyhow!(
                "home coordinates ({}, {}) are out of range",
                self.home.latitude,
                self.home.longitude
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_open_meteo() {
        let cfg = Config::default();

        assert_eq!(cfg.geocoding_url, DEFAULT_GEOCODING_URL);
        assert_eq!(cfg.forecast_url, DEFAULT_FORECAST_URL);
        assert_eq!(cfg.language, "ru");
        assert_eq!(cfg.lang(), Lang::Ru);
        assert_eq!(cfg.min_query_len, 3);
        assert_eq!(cfg.home.coordinates(), Coordinates::new(51.67, 39.22));
        assert_eq!(cfg.debounce(), Duration::from_millis(300));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.language = "en".to_string();
        cfg.home = HomeLocation {
            name: "Moscow".to_string(),
            latitude: 55.75,
            longitude: 37.62,
        };

        cfg.save_to(&path).expect("save");
        let loaded = Config::load_from(&path).expect("load");

        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "language = \"en\"\n").expect("write");

        let cfg = Config::load_from(&path).expect("load");

        assert_eq!(cfg.language, "en");
        assert_eq!(cfg.suggestion_count, 5);
        assert_eq!(cfg.home, HomeLocation::default());
    }

    #[test]
    fn rejects_invalid_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "suggestion_count = 0\n").expect("write");

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("suggestion_count"));
    }
}
