use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};

use crate::error::WeatherError;
use crate::model::Units;

/// The placeholder the setup instructions ship with; a key equal to this
/// value was never configured by the user.
pub const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

/// Environment variable consulted when no key is stored in the settings
/// file.
pub const API_KEY_ENV_VAR: &str = "OPENWEATHER_API_KEY";

/// How the presentation layer picks its color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    /// Hot palette above, cold palette below the temperature thresholds.
    AutoTemp,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::AutoTemp => "auto_temp",
        }
    }
}

/// User settings stored on disk: credential and display preferences.
///
/// A single owner loads this at startup and saves it on change; components
/// receive the values they need at construction instead of sharing a
/// mutable global.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeatherMap API key. `None` until `configure` has run; the
    /// `OPENWEATHER_API_KEY` environment variable is the fallback.
    pub api_key: Option<String>,

    #[serde(default)]
    pub units: Units,

    /// Provider display language code, e.g. "en" or "th".
    #[serde(default = "default_language")]
    pub language: String,

    /// Last successfully searched place, repeated when no place is given.
    pub last_location: Option<String>,

    #[serde(default)]
    pub theme: ThemeMode,
}

fn default_language() -> String {
    "en".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            units: Units::default(),
            language: default_language(),
            last_location: None,
            theme: ThemeMode::default(),
        }
    }
}

impl Config {
    /// Load settings from the platform config directory, or return defaults
    /// when no settings file exists yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no settings file yet.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save settings to the platform config directory, creating parent
    /// directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize settings to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the settings file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Resolve a usable API key, checking the settings file first and the
    /// environment second.
    ///
    /// # Errors
    ///
    /// Returns [`WeatherError::Configuration`] when no key is present or the
    /// stored key is still the shipped placeholder; nothing is ever sent to
    /// the network in that state.
    pub fn resolve_api_key(&self) -> Result<String, WeatherError> {
        let key = self
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok().filter(|k| !k.trim().is_empty()));

        match key {
            Some(key) if key == PLACEHOLDER_API_KEY => Err(WeatherError::Configuration(
                "the stored API key is still the placeholder value; \
                 run `skycast configure` with a real OpenWeatherMap key"
                    .into(),
            )),
            Some(key) => Ok(key),
            None => Err(WeatherError::Configuration(format!(
                "no OpenWeatherMap API key found; run `skycast configure` or set {API_KEY_ENV_VAR}"
            ))),
        }
    }

    /// Remember the last successfully fetched place.
    pub fn remember_location(&mut self, place: impl Into<String>) {
        self.last_location = Some(place.into());
    }
}
