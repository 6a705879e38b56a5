//! Theme identifiers, resource locators and the engine that swaps theme
//! resource sets in and out of the application's resource chain.

mod engine;
mod loader;
mod resources;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::UnknownTheme;

pub use engine::{ApplyOutcome, EngineState, ThemeEngine, ThemeSettings, ThemeSettingsProvider};
pub use loader::{BuiltinResourceLoader, ResourceLoader, parse_resource_set};
pub use resources::{ResourceChain, ResourceSet, ResourceSetId, ResourceValue};

/// Logical directory every theme resource set lives under.
pub const THEME_DIR: &str = "themes";

/// Locator of the resource set used at first run and as the fallback target.
pub const DEFAULT_THEME_LOCATOR: &str = "themes/default.toml";

/// A logical path identifying a loadable resource set.
#[derive(Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ResourceLocator(String);

impl ResourceLocator {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into().replace('\\', "/"))
    }

    #[must_use]
    pub fn default_theme() -> Self {
        Self::new(DEFAULT_THEME_LOCATOR)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_default_theme(&self) -> bool {
        self.0 == DEFAULT_THEME_LOCATOR
    }

    /// True when the first path segment is the reserved theme directory.
    #[must_use]
    pub fn is_theme_resource(&self) -> bool {
        self.0
            .trim_start_matches('/')
            .split('/')
            .next()
            .is_some_and(|segment| segment.eq_ignore_ascii_case(THEME_DIR))
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named theme choices.
///
/// Only the built-in theme exists today. Names that do not match a variant
/// resolve to [`Theme::Default`] so a stale setting never leaves the UI
/// without a theme.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize)]
pub enum Theme {
    #[default]
    Default,
}

impl Theme {
    pub const ALL: [Theme; 1] = [Theme::Default];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Theme::Default => "Default",
        }
    }

    #[must_use]
    pub fn locator(self) -> ResourceLocator {
        match self {
            Theme::Default => ResourceLocator::default_theme(),
        }
    }

    /// Case-insensitive lookup that falls back to [`Theme::Default`].
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| UnknownTheme(name.to_string()))
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name_or_default(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_theme_resolves_under_theme_dir() {
        for theme in Theme::ALL {
            assert!(theme.locator().is_theme_resource(), "{theme}");
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        assert_eq!(Theme::Default.locator(), Theme::Default.locator());
        assert!(Theme::Default.locator().is_default_theme());
    }

    #[test]
    fn unknown_names_fall_back_to_default() {
        assert_eq!(Theme::from_name_or_default("Solarized"), Theme::Default);
        assert_eq!(Theme::from_name_or_default(""), Theme::Default);
        assert_eq!(Theme::from_name_or_default(" default "), Theme::Default);
        assert!("Solarized".parse::<Theme>().is_err());
    }

    #[test]
    fn locator_detects_theme_directory() {
        assert!(ResourceLocator::new("themes/dark.toml").is_theme_resource());
        assert!(ResourceLocator::new("/Themes/dark.toml").is_theme_resource());
        assert!(ResourceLocator::new(r"themes\dark.toml").is_theme_resource());
        assert!(!ResourceLocator::new("styles/buttons.toml").is_theme_resource());
        assert!(!ResourceLocator::new("themesx/dark.toml").is_theme_resource());
    }
}
