//! crates/logging/src/config/env.rs
//! Environment-variable overrides layered on top of the base defaults.

use super::Configuration;
use super::parse::{parse_bool, parse_int, parse_level};
use crate::environment::Runtime;
use crate::level::Level;

/// Global minimum level name.
pub const LEVEL_VAR: &str = "DUALOG_LEVEL";
/// Global switch.
pub const ENABLED_VAR: &str = "DUALOG_ENABLED";
/// Timestamp prefix switch.
pub const TIMESTAMP_VAR: &str = "DUALOG_TIMESTAMP";
/// Stack-trace switch.
pub const STACK_TRACE_VAR: &str = "DUALOG_STACK_TRACE";
/// Color switch.
pub const COLORS_VAR: &str = "DUALOG_COLORS";
/// Persistence switch.
pub const PERSIST_VAR: &str = "DUALOG_PERSIST";
/// Persistence key prefix.
pub const STORAGE_PREFIX_VAR: &str = "DUALOG_STORAGE_PREFIX";
/// Control surface switch.
pub const CONTROL_VAR: &str = "DUALOG_CONTROL";
/// Control surface namespace.
pub const NAMESPACE_VAR: &str = "DUALOG_NAMESPACE";

/// Styled-text palette variables, one per message level.
pub const STYLED_COLOR_VARS: [(Level, &str); 4] = [
    (Level::Debug, "DUALOG_COLOR_DEBUG"),
    (Level::Info, "DUALOG_COLOR_INFO"),
    (Level::Warn, "DUALOG_COLOR_WARN"),
    (Level::Error, "DUALOG_COLOR_ERROR"),
];

/// ANSI palette variables, one per message level.
///
/// Values are SGR codes parsed as `u8`. Anything outside `0..=255`, such as
/// `"300"`, does not parse and keeps the current code.
pub const ANSI_COLOR_VARS: [(Level, &str); 4] = [
    (Level::Debug, "DUALOG_ANSI_DEBUG"),
    (Level::Info, "DUALOG_ANSI_INFO"),
    (Level::Warn, "DUALOG_ANSI_WARN"),
    (Level::Error, "DUALOG_ANSI_ERROR"),
];

/// Applies every recognised variable present in `runtime` to `config`.
///
/// Absent variables leave the corresponding field untouched. Unparseable
/// booleans resolve to `false`, unparseable integers keep the current value,
/// and unknown level names are ignored.
pub fn apply_overrides(config: &mut Configuration, runtime: &dyn Runtime) {
    let var = |name: &str| runtime.var(name);

    if let Some(level) = parse_level(var(LEVEL_VAR).as_deref()) {
        config.level = level;
    }

    config.enabled = parse_bool(var(ENABLED_VAR).as_deref(), config.enabled);
    config.show_timestamp = parse_bool(var(TIMESTAMP_VAR).as_deref(), config.show_timestamp);
    config.include_stack_trace =
        parse_bool(var(STACK_TRACE_VAR).as_deref(), config.include_stack_trace);
    config.colors.enabled = parse_bool(var(COLORS_VAR).as_deref(), config.colors.enabled);

    for (level, name) in STYLED_COLOR_VARS {
        if let (Some(value), Some(slot)) = (var(name), config.colors.styled.get_mut(level)) {
            *slot = value;
        }
    }

    for (level, name) in ANSI_COLOR_VARS {
        if let Some(slot) = config.colors.ansi.get_mut(level) {
            *slot = parse_int(var(name).as_deref(), *slot);
        }
    }

    config.persistence.enabled =
        parse_bool(var(PERSIST_VAR).as_deref(), config.persistence.enabled);
    if let Some(prefix) = var(STORAGE_PREFIX_VAR) {
        config.persistence.key_prefix = prefix;
    }

    config.control_surface.enabled =
        parse_bool(var(CONTROL_VAR).as_deref(), config.control_surface.enabled);
    if let Some(namespace) = var(NAMESPACE_VAR) {
        config.control_surface.namespace = namespace;
    }
}
