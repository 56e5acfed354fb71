//! crates/logging/src/config/partial.rs
//! Top-level partial configuration used for construction and updates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    CategoryConfig, ColorSettings, Configuration, ControlSurfaceSettings, PersistenceSettings,
};
use crate::level::Level;

/// Partial configuration merged over a [`Configuration`] at the top level.
///
/// The merge is shallow. Each `Some` field replaces the corresponding field
/// of the target, and nested sections (`categories`, `colors`, `persistence`,
/// `control_surface`) are replaced wholesale, never merged entry by entry.
/// Supplying `colors` therefore requires the complete [`ColorSettings`] the
/// caller wants in force:
///
/// ```
/// use dualog::{ColorSettings, Configuration, Environment, PartialConfig};
///
/// let env = Environment::from_parts(false, true, true);
/// let mut config = Configuration::defaults_for(&env);
/// config.colors.ansi.info = 94;
///
/// // Replaces the whole color section, including the customised info code.
/// PartialConfig::new()
///     .colors(ColorSettings::with_enabled(false))
///     .apply_to(&mut config);
///
/// assert!(!config.colors.enabled);
/// assert_eq!(config.colors.ansi.info, 32);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PartialConfig {
    /// Replacement global switch.
    pub enabled: Option<bool>,
    /// Replacement global minimum level.
    pub level: Option<Level>,
    /// Replacement category map.
    pub categories: Option<BTreeMap<String, CategoryConfig>>,
    /// Replacement timestamp switch.
    pub show_timestamp: Option<bool>,
    /// Replacement stack-trace switch.
    pub include_stack_trace: Option<bool>,
    /// Replacement color section.
    pub colors: Option<ColorSettings>,
    /// Replacement persistence section.
    pub persistence: Option<PersistenceSettings>,
    /// Replacement control surface section.
    pub control_surface: Option<ControlSurfaceSettings>,
}

impl PartialConfig {
    /// An empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the global switch.
    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    /// Sets the global minimum level.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Replaces the category map.
    #[must_use]
    pub fn categories(mut self, categories: BTreeMap<String, CategoryConfig>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Sets the timestamp switch.
    #[must_use]
    pub fn show_timestamp(mut self, show: bool) -> Self {
        self.show_timestamp = Some(show);
        self
    }

    /// Sets the stack-trace switch.
    #[must_use]
    pub fn include_stack_trace(mut self, include: bool) -> Self {
        self.include_stack_trace = Some(include);
        self
    }

    /// Replaces the color section.
    #[must_use]
    pub fn colors(mut self, colors: ColorSettings) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Replaces the persistence section.
    #[must_use]
    pub fn persistence(mut self, persistence: PersistenceSettings) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Replaces the control surface section.
    #[must_use]
    pub fn control_surface(mut self, control_surface: ControlSurfaceSettings) -> Self {
        self.control_surface = Some(control_surface);
        self
    }

    /// Reports whether the update changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merges the update into `config`.
    pub fn apply_to(self, config: &mut Configuration) {
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(level) = self.level {
            config.level = level;
        }
        if let Some(categories) = self.categories {
            config.categories = categories;
        }
        if let Some(show) = self.show_timestamp {
            config.show_timestamp = show;
        }
        if let Some(include) = self.include_stack_trace {
            config.include_stack_trace = include;
        }
        if let Some(colors) = self.colors {
            config.colors = colors;
        }
        if let Some(persistence) = self.persistence {
            config.persistence = persistence;
        }
        if let Some(control_surface) = self.control_surface {
            config.control_surface = control_surface;
        }
    }
}

impl From<Configuration> for PartialConfig {
    fn from(config: Configuration) -> Self {
        Self {
            enabled: Some(config.enabled),
            level: Some(config.level),
            categories: Some(config.categories),
            show_timestamp: Some(config.show_timestamp),
            include_stack_trace: Some(config.include_stack_trace),
            colors: Some(config.colors),
            persistence: Some(config.persistence),
            control_surface: Some(config.control_surface),
        }
    }
}
