//! Read-only access to the user configuration.
//!
//! The file lives at `%APPDATA%\Modkeep\config.toml` and is written by the
//! settings UI, never by this crate. Only the theme selection and the
//! palette override table are consumed here.

use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
};

use modkeep_core::{
    ConfigError,
    theme::{Theme, ThemeSettings, ThemeSettingsProvider},
};
use serde::{Deserialize, Serialize};

const APP_DIR: &str = "Modkeep";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Theme name as typed by the user; unknown names select the built-in theme.
    pub theme: String,

    /// Color key to `#RRGGBB` / `#AARRGGBB` replacements.
    pub palette_overrides: BTreeMap<String, String>,

    /// Directory whose `themes/` subfolder shadows the built-in theme files.
    pub theme_dir: Option<PathBuf>,
}

impl Config {
    #[must_use]
    pub fn theme(&self) -> Theme {
        Theme::from_name_or_default(&self.theme)
    }

    #[must_use]
    pub fn theme_settings(&self) -> ThemeSettings {
        ThemeSettings {
            theme: self.theme(),
            palette_overrides: self.palette_overrides.clone(),
        }
    }
}

pub fn config_path() -> io::Result<PathBuf> {
    let appdata = std::env::var_os("APPDATA")
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "APPDATA is not set"))?;

    Ok(PathBuf::from(appdata).join(APP_DIR).join(CONFIG_FILE))
}

/// Loads the config at `path`. A missing file yields the defaults.
pub fn load_path(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        return Ok(Config::default());
    }

    confy::load_path(path).map_err(confy_err)
}

pub fn load() -> Result<Config, ConfigError> {
    let path = config_path().map_err(|e| ConfigError::Unavailable(e.to_string()))?;
    load_path(&path)
}

fn confy_err(e: confy::ConfyError) -> ConfigError {
    match e {
        confy::ConfyError::BadTomlData(e) => ConfigError::Parse(e.to_string()),
        other => ConfigError::Unavailable(other.to_string()),
    }
}

/// Supplies theme settings from the config file on every call, so a theme
/// change written by the settings UI is picked up on the next reload.
#[derive(Debug, Clone, Default)]
pub struct ConfigThemeProvider {
    path: Option<PathBuf>,
}

impl ConfigThemeProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads from `path` instead of the `%APPDATA%` location.
    #[must_use]
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        match &self.path {
            Some(path) => load_path(path),
            None => load(),
        }
    }
}

impl ThemeSettingsProvider for ConfigThemeProvider {
    fn theme_settings(&self) -> Result<ThemeSettings, ConfigError> {
        self.load().map(|cfg| cfg.theme_settings())
    }
}
