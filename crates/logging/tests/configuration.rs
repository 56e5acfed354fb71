//! Integration tests for configuration resolution and mutation.
//!
//! Covers the layering of defaults, environment variables and caller
//! configuration, the parsing rules for variable values, and the
//! enable/disable operations.

mod support;

use std::collections::BTreeMap;

use dualog::config::env::{
    ANSI_COLOR_VARS, COLORS_VAR, ENABLED_VAR, LEVEL_VAR, NAMESPACE_VAR, STORAGE_PREFIX_VAR,
};
use dualog::sink::AnsiSink;
use dualog::{
    CategoryConfig, ColorSettings, ConfigResolver, Environment, HostRuntime, Level, Logger,
    PartialConfig, StaticRuntime,
};
use support::{ENV_LOCK, EnvGuard, SERVER_DEV, SERVER_PROD, server_logger};

fn resolve(runtime: &StaticRuntime, user: Option<PartialConfig>) -> dualog::Configuration {
    ConfigResolver::new(&SERVER_DEV, runtime, user).config()
}

// ============================================================================
// Precedence
// ============================================================================

/// Verifies base < environment < caller using the level.
#[test]
fn caller_beats_environment_beats_defaults() {
    let bare = StaticRuntime::server();
    assert_eq!(resolve(&bare, None).level, Level::Debug);

    let env = StaticRuntime::server().with_var(LEVEL_VAR, "WARN");
    assert_eq!(resolve(&env, None).level, Level::Warn);

    let user = PartialConfig::new().level(Level::Error);
    assert_eq!(resolve(&env, Some(user)).level, Level::Error);
}

/// Verifies a caller configuration leaves unrelated environment overrides
/// in place.
#[test]
fn caller_only_overrides_what_it_sets() {
    let env = StaticRuntime::server()
        .with_var(LEVEL_VAR, "INFO")
        .with_var(ENABLED_VAR, "false");
    let config = resolve(&env, Some(PartialConfig::new().level(Level::Error)));

    assert_eq!(config.level, Level::Error);
    assert!(!config.enabled);
}

/// Verifies production servers default to WARN without colors.
#[test]
fn production_server_defaults() {
    let config = ConfigResolver::new(&SERVER_PROD, &StaticRuntime::server(), None).config();
    assert_eq!(config.level, Level::Warn);
    assert!(!config.colors.enabled);
    assert!(!config.persistence.enabled);
    assert!(!config.control_surface.enabled);
}

/// Verifies browser development defaults turn on persistence and the
/// control surface.
#[test]
fn browser_development_defaults() {
    let env = Environment::from_parts(true, false, true);
    let config = ConfigResolver::new(&env, &StaticRuntime::browser(), None).config();
    assert_eq!(config.level, Level::Debug);
    assert!(config.colors.enabled);
    assert!(config.persistence.enabled);
    assert!(config.control_surface.enabled);
}

// ============================================================================
// Variable parsing
// ============================================================================

/// Verifies an unparseable boolean resolves to false rather than the default.
#[test]
fn unparseable_boolean_is_false() {
    let env = StaticRuntime::server().with_var(ENABLED_VAR, "maybe");
    assert!(!resolve(&env, None).enabled);

    for value in ["1", "yes", "", "on"] {
        let env = StaticRuntime::server().with_var(COLORS_VAR, value);
        assert!(!resolve(&env, None).colors.enabled, "{value:?} enabled colors");
    }

    let env = StaticRuntime::server().with_var(COLORS_VAR, "TRUE");
    assert!(resolve(&env, None).colors.enabled);
}

/// Verifies an unparseable ANSI code keeps its default while siblings change.
#[test]
fn unparseable_integer_keeps_palette_entry() {
    let (debug_var, error_var) = (ANSI_COLOR_VARS[0].1, ANSI_COLOR_VARS[3].1);
    let env = StaticRuntime::server()
        .with_var(debug_var, "not_a_number")
        .with_var(error_var, "91");
    let palette = resolve(&env, None).colors.ansi;

    assert_eq!(palette.debug, 36);
    assert_eq!(palette.error, 91);
    assert_eq!(palette.info, 32);
}

/// Verifies an unknown level name leaves the default untouched.
#[test]
fn unknown_level_name_is_ignored() {
    let env = StaticRuntime::server().with_var(LEVEL_VAR, "verbose");
    assert_eq!(resolve(&env, None).level, Level::Debug);

    let env = StaticRuntime::server().with_var(LEVEL_VAR, "silent");
    assert_eq!(resolve(&env, None).level, Level::Silent);
}

/// Verifies string variables are taken verbatim.
#[test]
fn string_variables_apply() {
    let env = StaticRuntime::server()
        .with_var(STORAGE_PREFIX_VAR, "shop")
        .with_var(NAMESPACE_VAR, "shopLog");
    let config = resolve(&env, None);
    assert_eq!(config.persistence.key_prefix, "shop");
    assert_eq!(config.control_surface.namespace, "shopLog");
}

/// Verifies the host runtime reads real process variables.
#[test]
fn host_runtime_reads_process_environment() {
    let _lock = ENV_LOCK.lock().unwrap();
    let _level = EnvGuard::set(LEVEL_VAR, "error");
    let _enabled = EnvGuard::set(ENABLED_VAR, "true");

    let logger = Logger::builder()
        .environment(SERVER_DEV)
        .runtime(HostRuntime)
        .build(AnsiSink::new(Vec::new(), Vec::new()));
    assert_eq!(logger.config().level, Level::Error);
}

/// Verifies the declared mode decides production on a server.
#[test]
fn host_runtime_reads_declared_mode() {
    let _lock = ENV_LOCK.lock().unwrap();
    let _mode = EnvGuard::set(dualog::MODE_VAR, dualog::PRODUCTION_MODE);

    let env = Environment::detect();
    assert!(env.is_server());
    assert!(env.is_production());
}

// ============================================================================
// Reads and mutations
// ============================================================================

/// Verifies configuration handed out is a copy.
#[test]
fn config_is_a_copy() {
    let (logger, _) = server_logger();
    let mut copy = logger.config();
    copy.level = Level::Silent;
    copy.categories
        .insert("x".to_owned(), CategoryConfig::enabled(Level::Info));
    copy.colors.ansi.debug = 0;

    let fresh = logger.config();
    assert_eq!(fresh.level, Level::Debug);
    assert!(fresh.categories.is_empty());
    assert_eq!(fresh.colors.ansi.debug, 36);
}

/// Verifies enable_all opens everything without inventing categories.
#[test]
fn enable_all_flips_known_categories() {
    let (mut logger, _) = server_logger();
    logger.set_level(Level::Error);
    logger.disable_category("a");
    logger.enable_category("b", Some(Level::Warn));
    logger.disable_category("b");
    logger.disable_all();

    logger.enable_all();

    let config = logger.config();
    assert!(config.enabled);
    assert_eq!(config.level, Level::Debug);
    assert_eq!(config.categories.len(), 2);
    assert!(config.categories.values().all(|category| category.enabled));
    assert_eq!(config.categories["b"].level, Level::Warn);
}

/// Verifies disable_all only clears the global switch.
#[test]
fn disable_all_keeps_levels_and_categories() {
    let (mut logger, _) = server_logger();
    logger.set_level(Level::Info);
    logger.enable_category("net", None);
    let before = logger.config();

    logger.disable_all();

    let after = logger.config();
    assert!(!after.enabled);
    assert_eq!(after.level, before.level);
    assert_eq!(after.categories, before.categories);
}

/// Verifies enable_category defaults to DEBUG.
#[test]
fn enable_category_defaults_to_debug() {
    let (mut logger, _) = server_logger();
    logger.enable_category("net", None);
    assert_eq!(
        logger.config().category("net"),
        Some(&CategoryConfig::enabled(Level::Debug))
    );
}

/// Verifies updates replace nested sections wholesale.
#[test]
fn update_replaces_nested_sections() {
    let (mut logger, _) = server_logger();
    let mut colors = ColorSettings::with_enabled(true);
    colors.ansi.warn = 93;
    logger.update_config(PartialConfig::new().colors(colors.clone()));
    assert_eq!(logger.config().colors, colors);

    // A fresh section resets every entry the caller did not copy over.
    logger.update_config(PartialConfig::new().colors(ColorSettings::with_enabled(true)));
    assert_eq!(logger.config().colors.ansi.warn, 33);
}

/// Verifies updates replace the category map wholesale.
#[test]
fn update_replaces_category_map() {
    let (mut logger, _) = server_logger();
    logger.enable_category("a", None);

    let mut categories = BTreeMap::new();
    categories.insert("b".to_owned(), CategoryConfig::enabled(Level::Info));
    logger.update_config(PartialConfig::new().categories(categories.clone()));

    assert_eq!(logger.config().categories, categories);
}

/// Verifies levels lists all five in order.
#[test]
fn levels_are_ordered() {
    let (logger, _) = server_logger();
    assert_eq!(
        logger.levels(),
        [Level::Debug, Level::Info, Level::Warn, Level::Error, Level::Silent]
    );
}
