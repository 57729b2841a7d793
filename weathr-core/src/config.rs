use directories::ProjectDirs;
use serde::{Deserialize, Deserializer};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::error::{Result, WeathrError};

/// Environment variable holding the OpenWeatherMap API key.
pub const API_KEY_VAR: &str = "OPEN_WEATHER_MAP_API_KEY";

pub const DEFAULT_CITY: &str = "London";

/// 5-day / 3-hour forecast endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Measurement system requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Units {
    /// Kelvin
    #[default]
    Standard,
    /// Celsius
    Metric,
    /// Fahrenheit
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Standard => "standard",
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Temperature scale suffix used in rendered output.
    pub fn letter(&self) -> &'static str {
        unit_letter(self.as_str())
    }
}

/// Maps a units literal to its scale letter. Anything that is not
/// `metric` or `imperial` is reported in Kelvin.
pub fn unit_letter(units: &str) -> &'static str {
    match units {
        "metric" => "C",
        "imperial" => "F",
        _ => "K",
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = WeathrError;

    fn try_from(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "standard" => Ok(Units::Standard),
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(WeathrError::InvalidArgument(format!(
                "unknown units '{value}'. Supported units: standard, metric, imperial."
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for Units {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Units::try_from(s.as_str()).map_err(serde::de::Error::custom)
    }
}

/// How the forecast is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// The decoded payload, unprojected
    #[default]
    Raw,
    /// Human-readable multi-day summary
    #[cfg_attr(feature = "cli", value(name = "string"))]
    Summary,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Raw => "raw",
            OutputFormat::Summary => "string",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OutputFormat {
    type Error = WeathrError;

    fn try_from(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "raw" => Ok(OutputFormat::Raw),
            "string" => Ok(OutputFormat::Summary),
            _ => Err(WeathrError::InvalidArgument(format!(
                "unknown format '{value}'. Supported formats: raw, string."
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        OutputFormat::try_from(s.as_str()).map_err(serde::de::Error::custom)
    }
}

/// The OpenWeatherMap API key. Resolved once at startup and handed to the
/// client; `Debug` never shows the key itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(missing_key());
        }
        Ok(Self(api_key))
    }

    /// Reads the key through `lookup`, which is given the variable name
    /// (`OPEN_WEATHER_MAP_API_KEY`). Pass `std::env::var` for the real thing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: FnOnce(&str) -> Option<String>,
    {
        lookup(API_KEY_VAR).map_or_else(|| Err(missing_key()), Self::new)
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

fn missing_key() -> WeathrError {
    WeathrError::Configuration(format!(
        "API key not set. Please set {API_KEY_VAR} environment variable"
    ))
}

/// Optional run parameters. Used both for the settings file and for the
/// values given on the command line; unset fields fall through to the next
/// layer.
///
/// Example TOML:
/// city = "Paris"
/// units = "metric"
/// format = "string"
/// timeout_secs = 10
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    pub city: Option<String>,
    pub units: Option<Units>,
    pub format: Option<OutputFormat>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Settings {
    /// Load the settings file, or return empty settings if there is none.
    pub fn load() -> Result<Self> {
        match Self::file_path() {
            Some(path) => Self::load_from(&path),
            None => {
                log::debug!("no platform config directory, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("settings file {} not found", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            WeathrError::Configuration(format!(
                "Failed to read settings file {}: {e}",
                path.display()
            ))
        })?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            WeathrError::Configuration(format!(
                "Failed to parse settings file {}: {e}",
                path.display()
            ))
        })?;

        log::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Path to the settings file, if the platform has a config directory.
    pub fn file_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "weathr", "weathr")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Fill every unset field of `self` from `fallback`.
    pub fn or(self, fallback: Settings) -> Settings {
        Settings {
            city: non_blank(self.city).or(non_blank(fallback.city)),
            units: self.units.or(fallback.units),
            format: self.format.or(fallback.format),
            endpoint: non_blank(self.endpoint).or(non_blank(fallback.endpoint)),
            timeout_secs: self.timeout_secs.or(fallback.timeout_secs),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// Fully resolved run parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub city: String,
    pub units: Units,
    pub format: OutputFormat,
    pub endpoint: String,
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Settings::default().into()
    }
}

impl From<Settings> for Config {
    fn from(settings: Settings) -> Self {
        Config {
            city: non_blank(settings.city).unwrap_or_else(|| DEFAULT_CITY.to_string()),
            units: settings.units.unwrap_or_default(),
            format: settings.format.unwrap_or_default(),
            endpoint: non_blank(settings.endpoint).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            timeout: settings.timeout_secs.map(Duration::from_secs),
        }
    }
}
