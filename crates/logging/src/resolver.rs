//! crates/logging/src/resolver.rs
//! Layered configuration resolution and the mutations a logger applies to it.

use crate::config::{CategoryConfig, Configuration, PartialConfig, env};
use crate::environment::{Environment, Runtime};
use crate::level::Level;

/// Owns the effective configuration of one logger.
///
/// Resolution order, lowest precedence first:
///
/// 1. runtime-aware defaults ([`Configuration::defaults_for`]);
/// 2. environment variables ([`env::apply_overrides`]);
/// 3. the caller's [`PartialConfig`].
///
/// Environment variables beat the defaults, and configuration passed at
/// construction beats environment variables. This ordering is deliberate and
/// covered by tests; note that it is the reverse of the common convention of
/// letting the environment override explicit configuration.
#[derive(Clone, Debug)]
pub struct ConfigResolver {
    config: Configuration,
}

impl ConfigResolver {
    /// Resolves the configuration for `environment`.
    pub fn new(
        environment: &Environment,
        runtime: &dyn Runtime,
        user: Option<PartialConfig>,
    ) -> Self {
        let mut config = Configuration::defaults_for(environment);
        env::apply_overrides(&mut config, runtime);
        if let Some(user) = user {
            user.apply_to(&mut config);
        }
        Self { config }
    }

    /// Wraps an already resolved configuration.
    #[must_use]
    pub const fn from_config(config: Configuration) -> Self {
        Self { config }
    }

    /// Returns a copy of the effective configuration.
    #[must_use]
    pub fn config(&self) -> Configuration {
        self.config.clone()
    }

    /// Borrows the effective configuration for gating.
    #[must_use]
    pub const fn current(&self) -> &Configuration {
        &self.config
    }

    /// Shallow-merges `update` into the effective configuration.
    ///
    /// See [`PartialConfig`] for the wholesale replacement of nested sections.
    pub fn update(&mut self, update: PartialConfig) {
        update.apply_to(&mut self.config);
    }

    /// Sets the global minimum level.
    pub fn set_level(&mut self, level: Level) {
        self.config.level = level;
    }

    /// Enables `category` at `level`, registering it when unknown.
    pub fn enable_category(&mut self, category: &str, level: Level) {
        self.config
            .categories
            .insert(category.to_owned(), CategoryConfig::enabled(level));
    }

    /// Disables `category`.
    ///
    /// A known category keeps its level; an unknown one is registered
    /// disabled at the current global level.
    pub fn disable_category(&mut self, category: &str) {
        let global = self.config.level;
        self.config
            .categories
            .entry(category.to_owned())
            .or_insert(CategoryConfig {
                enabled: false,
                level: global,
            })
            .enabled = false;
    }

    /// Enables logging, drops the global level to `Debug`, and enables every
    /// registered category. No category is added.
    pub fn enable_all(&mut self) {
        self.config.enabled = true;
        self.config.level = Level::Debug;
        for category in self.config.categories.values_mut() {
            category.enabled = true;
        }
    }

    /// Clears the global switch only.
    pub fn disable_all(&mut self) {
        self.config.enabled = false;
    }

    /// Reports the global switch.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.enabled
    }
}
