//src/config.rs
use comfy_table::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::session::SessionSettings;

const CONFIG_FILE_NAME: &str = "config.toml";
const APP_CONFIG_DIR: &str = "pale-grind";
const CONFIG_ENV_VAR: &str = "PALE_GRIND_CONFIG_DIR"; // Environment variable name
const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Could not determine configuration directory.")]
    CannotDetermineConfigDir,
    #[error("I/O error accessing config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file (TOML): {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Failed to serialize config data (TOML): {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Invalid color name: {0}")]
    InvalidColor(String),
    #[error("Invalid rest duration: {0}. Rest periods must be at least one second.")]
    InvalidRestDuration(u64),
}

// Define standard colors using strum for easy iteration/parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum StandardColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    DarkGrey,
    DarkRed,
    DarkGreen,
    DarkYellow,
    DarkBlue,
    DarkMagenta,
    DarkCyan,
    Grey,
}

// Helper to convert our enum to comfy_table::Color
impl From<StandardColor> for Color {
    fn from(value: StandardColor) -> Self {
        match value {
            StandardColor::Black => Self::Black,
            StandardColor::Red => Self::Red,
            StandardColor::Green => Self::Green,
            StandardColor::Yellow => Self::Yellow,
            StandardColor::Blue => Self::Blue,
            StandardColor::Magenta => Self::Magenta,
            StandardColor::Cyan => Self::Cyan,
            StandardColor::White => Self::White,
            StandardColor::DarkGrey => Self::DarkGrey,
            StandardColor::DarkRed => Self::DarkRed,
            StandardColor::DarkGreen => Self::DarkGreen,
            StandardColor::DarkYellow => Self::DarkYellow,
            StandardColor::DarkBlue => Self::DarkBlue,
            StandardColor::DarkMagenta => Self::DarkMagenta,
            StandardColor::DarkCyan => Self::DarkCyan,
            StandardColor::Grey => Self::Grey,
        }
    }
}

/// Parses a color name (case-insensitive) into a `StandardColor`.
/// # Errors
/// Returns `Error::InvalidColor` if the name matches no standard color.
pub fn parse_color(color_str: &str) -> Result<StandardColor, Error> {
    for color in StandardColor::iter() {
        if format!("{color:?}").eq_ignore_ascii_case(color_str.trim()) {
            return Ok(color);
        }
    }
    Err(Error::InvalidColor(color_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Theme {
    pub header_color: String,
    pub accent_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_color: "Blue".to_string(),
            accent_color: "Magenta".to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Config {
    // Text generation
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,

    // Rest and celebration timing
    pub completion_rest_seconds: u64,
    pub default_rest_seconds: u64,
    pub rest_presets: Vec<u64>,
    pub celebration_millis: u64,

    /// Optional TOML file replacing the built-in exercise catalog
    pub catalog_path: Option<PathBuf>,

    // Theming
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 30,
            completion_rest_seconds: 90,
            default_rest_seconds: 60,
            rest_presets: vec![60, 90],
            celebration_millis: 4500,
            catalog_path: None,
            theme: Theme::default(),
        }
    }
}

impl Config {
    /// Resolves the API key, preferring the environment over the config file.
    /// Blank values count as absent.
    #[must_use]
    pub fn resolved_api_key(&self) -> Option<String> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .chain(self.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
    }

    /// Timing knobs for a workout session.
    /// # Errors
    /// Returns `Error::InvalidRestDuration` if a configured rest period is zero.
    pub fn session_settings(&self) -> Result<SessionSettings, Error> {
        for &secs in self
            .rest_presets
            .iter()
            .chain([&self.completion_rest_seconds, &self.default_rest_seconds])
        {
            if secs == 0 {
                return Err(Error::InvalidRestDuration(secs));
            }
        }
        Ok(SessionSettings {
            completion_rest_seconds: self.completion_rest_seconds,
            default_rest_seconds: self.default_rest_seconds,
            celebration: Duration::from_millis(self.celebration_millis),
        })
    }
}

/// Determines the directory holding the configuration file (and the TUI log).
pub fn get_config_dir() -> Result<PathBuf, Error> {
    let config_dir_override = std::env::var(CONFIG_ENV_VAR).ok();

    let config_dir_path = if let Some(path_str) = config_dir_override {
        let path = PathBuf::from(path_str);
        if !path.is_dir() {
            tracing::warn!(
                "{} points to '{}', which is not a directory. Trying to create it.",
                CONFIG_ENV_VAR,
                path.display()
            );
            fs::create_dir_all(&path)?;
        }
        path
    } else {
        let base_config_dir = dirs::config_dir().ok_or(Error::CannotDetermineConfigDir)?;
        base_config_dir.join(APP_CONFIG_DIR)
    };

    if !config_dir_path.exists() {
        fs::create_dir_all(&config_dir_path)?;
    }

    Ok(config_dir_path)
}

/// Determines the path to the configuration file.
/// Exposed at crate root as `get_config_path_util`
pub fn get_config_path() -> Result<PathBuf, Error> {
    Ok(get_config_dir()?.join(CONFIG_FILE_NAME))
}

/// Loads the configuration from the TOML file at the given path.
/// A missing file is created with defaults.
/// Exposed at crate root as `load_config_util`
pub fn load(config_path: &Path) -> Result<Config, Error> {
    if config_path.exists() {
        let config_content = fs::read_to_string(config_path)?;
        let config: Config = toml::from_str(&config_content)?;
        Ok(config)
    } else {
        let default_config = Config::default();
        save(config_path, &default_config)?;
        Ok(default_config)
    }
}

/// Saves the configuration to the TOML file.
/// Exposed at crate root as `save_config_util`
pub fn save(config_path: &Path, config: &Config) -> Result<(), Error> {
    if let Some(parent_dir) = config_path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            fs::create_dir_all(parent_dir)?;
        }
    }
    let config_content = toml::to_string_pretty(config)?;
    fs::write(config_path, config_content)?;
    Ok(())
}

/// Loads the file at `config_path`, replaces its stored API key and saves it back.
/// Blank keys clear the entry. Takes effect on the next start.
/// Exposed at crate root as `store_api_key_util`
pub fn store_api_key(config_path: &Path, key: Option<String>) -> Result<Config, Error> {
    let mut config = load(config_path)?;
    config.api_key = key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    save(config_path, &config)?;
    Ok(config)
}
