//! crates/logging/src/config.rs
//! Effective configuration snapshot and its nested sections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::environment::Environment;
use crate::level::Level;

pub mod env;
pub mod parse;
mod partial;

pub use partial::PartialConfig;

/// Default key prefix for persisted state and default control namespace.
pub const DEFAULT_PREFIX: &str = "dualog";

/// Compiled-in ANSI color codes (debug, info, warn, error).
pub const DEFAULT_ANSI_PALETTE: [u8; 4] = [36, 32, 33, 31];

/// Compiled-in CSS colors (debug, info, warn, error).
pub const DEFAULT_STYLED_PALETTE: [&str; 4] = ["#7f8c8d", "#2980b9", "#f39c12", "#c0392b"];

/// Per-category override of the global switch and threshold.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// Whether messages in the category may be emitted at all.
    pub enabled: bool,
    /// Minimum level for messages in the category.
    pub level: Level,
}

impl CategoryConfig {
    /// An enabled category with the given threshold.
    #[must_use]
    pub const fn enabled(level: Level) -> Self {
        Self {
            enabled: true,
            level,
        }
    }
}

/// One value per message level.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Palette<T> {
    /// Value used for `DEBUG` messages.
    pub debug: T,
    /// Value used for `INFO` messages.
    pub info: T,
    /// Value used for `WARN` messages.
    pub warn: T,
    /// Value used for `ERROR` messages.
    pub error: T,
}

impl<T> Palette<T> {
    /// Entry for `level`, or `None` for [`Level::Silent`].
    pub fn get(&self, level: Level) -> Option<&T> {
        match level {
            Level::Debug => Some(&self.debug),
            Level::Info => Some(&self.info),
            Level::Warn => Some(&self.warn),
            Level::Error => Some(&self.error),
            Level::Silent => None,
        }
    }

    /// Mutable entry for `level`, or `None` for [`Level::Silent`].
    pub fn get_mut(&mut self, level: Level) -> Option<&mut T> {
        match level {
            Level::Debug => Some(&mut self.debug),
            Level::Info => Some(&mut self.info),
            Level::Warn => Some(&mut self.warn),
            Level::Error => Some(&mut self.error),
            Level::Silent => None,
        }
    }
}

impl<T: Clone> Palette<T> {
    fn from_array(values: &[T; 4]) -> Self {
        Self {
            debug: values[0].clone(),
            info: values[1].clone(),
            warn: values[2].clone(),
            error: values[3].clone(),
        }
    }
}

/// Color treatment applied by the sinks.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ColorSettings {
    /// Whether sinks colorize output.
    pub enabled: bool,
    /// CSS colors for styled-text rendering.
    pub styled: Palette<String>,
    /// SGR color codes for escape-sequence rendering.
    pub ansi: Palette<u8>,
}

impl ColorSettings {
    /// Compiled-in palettes with the given switch.
    #[must_use]
    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            enabled,
            styled: Palette::from_array(&DEFAULT_STYLED_PALETTE.map(str::to_owned)),
            ansi: Palette::from_array(&DEFAULT_ANSI_PALETTE),
        }
    }
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self::with_enabled(true)
    }
}

/// Where and whether a sink persists the configuration.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceSettings {
    /// Whether the configuration is saved and restored.
    pub enabled: bool,
    /// Prefix of the persisted keys.
    pub key_prefix: String,
}

impl PersistenceSettings {
    /// Key holding the serialized configuration.
    #[must_use]
    pub fn config_key(&self) -> String {
        format!("{}_config", self.key_prefix)
    }

    /// Key holding the global switch as `"true"` or `"false"`.
    #[must_use]
    pub fn enabled_key(&self) -> String {
        format!("{}_enabled", self.key_prefix)
    }
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            key_prefix: DEFAULT_PREFIX.to_owned(),
        }
    }
}

/// Runtime control surface exposed by the browser sink.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ControlSurfaceSettings {
    /// Whether the control surface is installed.
    pub enabled: bool,
    /// Name under which it is installed.
    pub namespace: String,
}

impl Default for ControlSurfaceSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            namespace: DEFAULT_PREFIX.to_owned(),
        }
    }
}

/// Fully resolved configuration.
///
/// Values handed out by the logger are clones; changing them has no effect
/// until passed back through an update.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Global switch.
    pub enabled: bool,
    /// Global minimum level.
    pub level: Level,
    /// Per-category overrides. Absent categories use the global values.
    pub categories: BTreeMap<String, CategoryConfig>,
    /// Prefix messages with a timestamp.
    pub show_timestamp: bool,
    /// Emit error stack information as a second write.
    pub include_stack_trace: bool,
    /// Color treatment.
    pub colors: ColorSettings,
    /// Persistence of the configuration.
    pub persistence: PersistenceSettings,
    /// Runtime control surface.
    pub control_surface: ControlSurfaceSettings,
}

impl Configuration {
    /// Runtime-aware base defaults, before any override is applied.
    #[must_use]
    pub fn defaults_for(env: &Environment) -> Self {
        Self {
            enabled: true,
            level: if env.is_development() {
                Level::Debug
            } else {
                Level::Warn
            },
            categories: BTreeMap::new(),
            show_timestamp: true,
            include_stack_trace: true,
            colors: ColorSettings::with_enabled(env.is_browser() || env.is_development()),
            persistence: PersistenceSettings {
                enabled: env.is_browser(),
                ..PersistenceSettings::default()
            },
            control_surface: ControlSurfaceSettings {
                enabled: env.is_browser() && env.is_development(),
                ..ControlSurfaceSettings::default()
            },
        }
    }

    /// Override registered for `category`, if any.
    pub fn category(&self, category: &str) -> Option<&CategoryConfig> {
        self.categories.get(category)
    }
}
