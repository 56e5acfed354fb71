//! crates/logging/src/control.rs
//! Textual commands accepted by the runtime control surface.
//!
//! A logger that serves a control surface hands its sink a [`ControlHandler`]
//! bound to itself; the browser sink installs that handler under the
//! configured namespace. Embedders without a window can feed the same strings
//! to [`Logger::execute`](crate::Logger::execute).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use crate::level::{Level, ParseLevelError};

/// Usage text returned by the `help` command.
pub const HELP: &str = "\
enable                    enable logging at DEBUG and every known category
disable                   disable logging
level <name>              set the global level (DEBUG, INFO, WARN, ERROR, SILENT)
enable <category> [level] enable a category, DEBUG when no level is given
disable <category>        disable a category
config                    print the effective configuration as JSON
help                      print this text";

/// Receives each command typed into a control surface and returns the reply.
///
/// Handlers are built by the logger they drive, see
/// [`Logger::into_shared`](crate::Logger::into_shared).
pub type ControlHandler = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Reply text for the outcome of `input`; rejections are also reported
/// through `tracing`.
pub(crate) fn reply(input: &str, result: Result<String, ControlCommandError>) -> String {
    result.unwrap_or_else(|error| {
        tracing::warn!(target: "dualog::control", %input, %error, "rejected control command");
        error.to_string()
    })
}

/// One parsed control command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ControlCommand {
    /// Equivalent to `enable_all`.
    EnableAll,
    /// Equivalent to `disable_all`.
    DisableAll,
    /// Sets the global level.
    SetLevel(Level),
    /// Enables a category at the given level, `Debug` when absent.
    EnableCategory {
        /// Category name.
        name: String,
        /// Requested threshold.
        level: Option<Level>,
    },
    /// Disables a category.
    DisableCategory(String),
    /// Dumps the effective configuration.
    ShowConfig,
    /// Prints [`HELP`].
    Help,
}

/// Reasons a control command is rejected.
#[derive(Debug, Error)]
pub enum ControlCommandError {
    /// Nothing but whitespace was given.
    #[error("empty command; try `help`")]
    Empty,
    /// The first word is not a command.
    #[error("unknown command `{0}`; try `help`")]
    Unknown(String),
    /// A required argument is missing.
    #[error("`{command}` expects {argument}")]
    MissingArgument {
        /// Command word.
        command: &'static str,
        /// Description of the missing argument.
        argument: &'static str,
    },
    /// More words were given than the command takes.
    #[error("unexpected argument `{0}`")]
    UnexpectedArgument(String),
    /// A level argument did not name a level.
    #[error(transparent)]
    Level(#[from] ParseLevelError),
    /// The configuration could not be rendered for `config`.
    #[error("failed to render configuration: {0}")]
    Render(#[from] serde_json::Error),
}

impl FromStr for ControlCommand {
    type Err = ControlCommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut words = input.split_whitespace();
        let command = words.next().ok_or(ControlCommandError::Empty)?;

        let parsed = match command.to_ascii_lowercase().as_str() {
            "enable" => match words.next() {
                None => Self::EnableAll,
                Some(name) => Self::EnableCategory {
                    name: name.to_owned(),
                    level: words.next().map(str::parse).transpose()?,
                },
            },
            "disable" => match words.next() {
                None => Self::DisableAll,
                Some(name) => Self::DisableCategory(name.to_owned()),
            },
            "level" => {
                let name = words.next().ok_or(ControlCommandError::MissingArgument {
                    command: "level",
                    argument: "a level name",
                })?;
                Self::SetLevel(name.parse()?)
            }
            "config" => Self::ShowConfig,
            "help" => Self::Help,
            other => return Err(ControlCommandError::Unknown(other.to_owned())),
        };

        match words.next() {
            Some(extra) => Err(ControlCommandError::UnexpectedArgument(extra.to_owned())),
            None => Ok(parsed),
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnableAll => f.write_str("enable"),
            Self::DisableAll => f.write_str("disable"),
            Self::SetLevel(level) => write!(f, "level {level}"),
            Self::EnableCategory { name, level: None } => write!(f, "enable {name}"),
            Self::EnableCategory {
                name,
                level: Some(level),
            } => write!(f, "enable {name} {level}"),
            Self::DisableCategory(name) => write!(f, "disable {name}"),
            Self::ShowConfig => f.write_str("config"),
            Self::Help => f.write_str("help"),
        }
    }
}
