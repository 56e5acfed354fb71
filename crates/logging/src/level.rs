//! crates/logging/src/level.rs
//! Ordered severity levels shared by the gate, the resolver, and the sinks.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ordered severity of a log message or threshold.
///
/// The ordering is load-bearing: a message is eligible only when its level is
/// greater than or equal to the configured threshold. [`Level::Silent`] is a
/// threshold value only; no message is ever logged at `Silent`, so a `Silent`
/// threshold suppresses everything, including [`Level::Error`].
///
/// # Examples
///
/// ```
/// use dualog::Level;
///
/// assert!(Level::Warn > Level::Info);
/// assert_eq!("warn".parse::<Level>(), Ok(Level::Warn));
/// assert_eq!(Level::Error.to_string(), "ERROR");
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Level {
    /// Verbose diagnostics for development.
    Debug = 0,
    /// Routine informational messages.
    Info = 1,
    /// Unexpected but recoverable conditions.
    Warn = 2,
    /// Failures.
    Error = 3,
    /// Threshold that suppresses every message.
    Silent = 4,
}

impl Level {
    /// Every level in ascending order, `Silent` last.
    pub const ALL: [Self; 5] = [
        Self::Debug,
        Self::Info,
        Self::Warn,
        Self::Error,
        Self::Silent,
    ];

    /// The four levels a message may be logged at.
    pub const MESSAGE_LEVELS: [Self; 4] = [Self::Debug, Self::Info, Self::Warn, Self::Error];

    /// Upper-case name used in output and persisted configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
            Self::Silent => "SILENT",
        }
    }

    /// Numeric value of the level (`Debug` = 0 … `Silent` = 4).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Reports whether messages may be logged at this level.
    #[must_use]
    pub const fn is_message_level(self) -> bool {
        !matches!(self, Self::Silent)
    }

    /// Case-insensitive lookup by name, returning `None` for anything else.
    ///
    /// This is the "no override" form used when reading environment values:
    /// an unknown name leaves the previous value in place instead of
    /// substituting a default.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a [`Level`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("unknown log level `{0}`; expected one of debug, info, warn, error, silent")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| ParseLevelError(s.to_owned()))
    }
}
