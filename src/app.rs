//! Application-wide constants and the state owned by the main window.

use modkeep_core::{
    Color,
    theme::{ApplyOutcome, BuiltinResourceLoader, ThemeEngine},
};

use crate::config::{Config, ConfigThemeProvider};

pub const APP_NAME: &str = "Modkeep";

/// Name of the system-wide mutex that marks the running instance.
pub const INSTANCE_LOCK_NAME: &str = r"Global\Modkeep_SingleInstance";

/// Palette key painted as the main window background.
pub const BACKGROUND_KEY: &str = "BackgroundColor";

/// State stored in the main window's user data.
pub struct AppState {
    pub theme: ThemeEngine<BuiltinResourceLoader>,
    pub provider: ConfigThemeProvider,
}

impl AppState {
    /// Builds the theme engine and applies the configured theme.
    ///
    /// Configuration problems never prevent startup; the built-in theme is
    /// used instead.
    pub fn start(provider: ConfigThemeProvider) -> Self {
        let mut state = Self {
            theme: ThemeEngine::new(resource_loader(&provider)),
            provider,
        };
        let outcome = state.theme.initialize(&state.provider);
        log_outcome(&outcome);
        state
    }

    /// Re-reads the configuration, including `theme_dir`, and swaps the
    /// theme in place.
    pub fn reload_theme(&mut self) -> ApplyOutcome {
        self.theme.set_loader(resource_loader(&self.provider));
        let outcome = self.theme.initialize(&self.provider);
        log_outcome(&outcome);
        outcome
    }

    #[must_use]
    pub fn background(&self) -> Option<Color> {
        self.theme.color(BACKGROUND_KEY)
    }
}

fn resource_loader(provider: &ConfigThemeProvider) -> BuiltinResourceLoader {
    match provider.load() {
        Ok(Config {
            theme_dir: Some(dir),
            ..
        }) => BuiltinResourceLoader::with_override_root(dir),
        _ => BuiltinResourceLoader::new(),
    }
}

fn log_outcome(outcome: &ApplyOutcome) {
    match outcome {
        ApplyOutcome::Applied { locator } => tracing::info!(%locator, "theme active"),
        ApplyOutcome::FellBack { requested, reason } => {
            tracing::warn!(%requested, %reason, "requested theme unavailable, built-in theme active");
        }
        ApplyOutcome::Failed { error } => tracing::error!(%error, "no theme could be applied"),
    }
}

/// Packs a color as a GDI `COLORREF` value (`0x00BBGGRR`). Alpha is dropped.
#[must_use]
pub const fn colorref_value(color: Color) -> u32 {
    ((color.b as u32) << 16) | ((color.g as u32) << 8) | color.r as u32
}
