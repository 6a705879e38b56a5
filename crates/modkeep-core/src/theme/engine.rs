//! Theme swapping with palette overrides and a bounded fallback to the
//! built-in theme.
//!
//! The engine owns the application's [`ResourceChain`] and the handle of the
//! theme set currently merged into it. A swap always removes the previous
//! theme set before merging the new one, so at most one theme set is merged
//! at any time.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::{
    ResourceChain, ResourceLoader, ResourceLocator, ResourceSet, ResourceSetId, ResourceValue,
    Theme,
};
use crate::{
    color::{Color, parse_color},
    error::{ConfigError, ThemeError},
};

/// Theme choice plus per-key color overrides, as supplied by configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub theme: Theme,
    pub palette_overrides: BTreeMap<String, String>,
}

/// Source of [`ThemeSettings`], typically the application configuration.
pub trait ThemeSettingsProvider {
    fn theme_settings(&self) -> Result<ThemeSettings, ConfigError>;
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EngineState {
    Uninitialized,
    Active,
}

/// Result of a theme swap. Swaps never fail past the engine boundary; this
/// only reports what happened.
#[derive(Debug)]
pub enum ApplyOutcome {
    Applied {
        locator: ResourceLocator,
    },
    FellBack {
        requested: ResourceLocator,
        reason: ThemeError,
    },
    Failed {
        error: ThemeError,
    },
}

impl ApplyOutcome {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, ApplyOutcome::Failed { .. })
    }
}

pub struct ThemeEngine<L> {
    loader: L,
    chain: ResourceChain,
    active: Option<ResourceSetId>,
}

impl<L: ResourceLoader> ThemeEngine<L> {
    pub fn new(loader: L) -> Self {
        Self::with_chain(loader, ResourceChain::new())
    }

    /// Adopts an existing chain. A theme set already merged into it is
    /// replaced on the first swap.
    pub fn with_chain(loader: L, chain: ResourceChain) -> Self {
        Self {
            loader,
            chain,
            active: None,
        }
    }

    /// Replaces the loader used by later swaps. The active set stays merged
    /// until the next swap.
    pub fn set_loader(&mut self, loader: L) {
        self.loader = loader;
    }

    /// Applies the configured theme, or the built-in one when configuration
    /// cannot be read.
    pub fn initialize(&mut self, provider: &dyn ThemeSettingsProvider) -> ApplyOutcome {
        let settings = provider.theme_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "theme settings unavailable, using built-in theme");
            ThemeSettings::default()
        });

        self.apply_theme(settings.theme, &settings.palette_overrides)
    }

    pub fn apply_theme(
        &mut self,
        theme: Theme,
        overrides: &BTreeMap<String, String>,
    ) -> ApplyOutcome {
        tracing::debug!(%theme, "applying theme");
        self.apply_resource(theme.locator(), overrides)
    }

    /// Swaps in the resource set at `locator`.
    ///
    /// If that fails and `locator` is not the built-in theme, the built-in
    /// theme is tried exactly once with the same overrides.
    pub fn apply_resource(
        &mut self,
        locator: ResourceLocator,
        overrides: &BTreeMap<String, String>,
    ) -> ApplyOutcome {
        let reason = match self.swap(&locator, overrides) {
            Ok(()) => return ApplyOutcome::Applied { locator },
            Err(e) => e,
        };

        if locator.is_default_theme() {
            tracing::error!(error = %reason, "built-in theme failed to load");
            return ApplyOutcome::Failed { error: reason };
        }

        tracing::warn!(error = %reason, %locator, "theme failed to load, falling back to built-in theme");

        match self.swap(&ResourceLocator::default_theme(), overrides) {
            Ok(()) => ApplyOutcome::FellBack {
                requested: locator,
                reason,
            },
            Err(error) => {
                tracing::error!(%error, "built-in theme failed to load");
                ApplyOutcome::Failed { error }
            }
        }
    }

    fn swap(
        &mut self,
        locator: &ResourceLocator,
        overrides: &BTreeMap<String, String>,
    ) -> Result<(), ThemeError> {
        self.remove_active();

        let mut set = self.loader.load(locator)?;
        let applied = apply_overrides(&mut set, overrides);

        self.active = Some(self.chain.merge(set));
        tracing::info!(%locator, overrides = applied, "theme applied");
        Ok(())
    }

    fn remove_active(&mut self) {
        let Some(id) = self.active.take().or_else(|| self.chain.find_theme()) else {
            return;
        };

        if let Some(previous) = self.chain.remove(id) {
            tracing::debug!(origin = ?previous.origin(), "removed previous theme");
        }
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        if self.active.is_some() {
            EngineState::Active
        } else {
            EngineState::Uninitialized
        }
    }

    #[must_use]
    pub fn active_locator(&self) -> Option<&ResourceLocator> {
        self.active
            .and_then(|id| self.chain.get_set(id))
            .and_then(ResourceSet::origin)
    }

    #[must_use]
    pub fn active_set(&self) -> Option<&ResourceSet> {
        self.active.and_then(|id| self.chain.get_set(id))
    }

    /// Resolves `key` through the whole chain and returns it if it is a color.
    #[must_use]
    pub fn color(&self, key: &str) -> Option<Color> {
        self.chain.lookup(key).and_then(ResourceValue::as_color)
    }

    #[must_use]
    pub fn chain(&self) -> &ResourceChain {
        &self.chain
    }

    /// Merges a non-theme resource set (styles, strings) into the chain.
    pub fn merge_resources(&mut self, set: ResourceSet) -> ResourceSetId {
        self.chain.merge(set)
    }
}

/// Writes override colors into `set` in place and returns how many were used.
fn apply_overrides(set: &mut ResourceSet, overrides: &BTreeMap<String, String>) -> usize {
    let mut applied = 0;

    for (key, value) in overrides {
        if key.trim().is_empty() || value.trim().is_empty() {
            tracing::debug!(%key, "palette override ignored: blank");
            continue;
        }
        if !set.contains_key(key) {
            tracing::debug!(%key, "palette override ignored: unknown key");
            continue;
        }
        let Some(color) = parse_color(value) else {
            tracing::debug!(%key, %value, "palette override ignored: invalid color");
            continue;
        };

        set.insert(key.clone(), ResourceValue::Color(color));
        applied += 1;
    }

    applied
}
