//! crates/logging/src/config/parse.rs
//! Lenient value parsers used for environment overrides.
//!
//! None of these fail: a bad value falls back to the supplied default, or to
//! "no override" for level names.

use std::str::FromStr;

use crate::level::Level;

/// Parses a boolean flag.
///
/// Only a case-insensitive `"true"` yields `true`; any other present value,
/// including `"1"`, `"yes"` and the empty string, yields `false`. An absent
/// value yields `default`.
///
/// ```
/// use dualog::config::parse::parse_bool;
///
/// assert!(parse_bool(Some("TRUE"), false));
/// assert!(!parse_bool(Some("yes"), true));
/// assert!(parse_bool(None, true));
/// ```
pub fn parse_bool(value: Option<&str>, default: bool) -> bool {
    value.map_or(default, |value| value.eq_ignore_ascii_case("true"))
}

/// Parses a base-10 integer, falling back to `default` when absent or invalid.
pub fn parse_int<T: FromStr>(value: Option<&str>, default: T) -> T {
    value
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}

/// Parses a level name; `None` means "leave the current value alone".
pub fn parse_level(value: Option<&str>) -> Option<Level> {
    value.and_then(Level::from_name)
}
