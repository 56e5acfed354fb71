//! crates/logging/src/sink.rs
//! Output sinks: the capability trait and its two runtime implementations.
//!
//! The gate hands a sink an already gated, already formatted [`Record`]. What
//! happens next (channel choice, colors, persistence, control surface) is the
//! sink's business:
//!
//! - [`AnsiSink`] serves server processes and wraps messages in SGR escape
//!   sequences.
//! - [`StyledSink`] serves browsers, renders `%c` styled text to a
//!   [`Console`], and persists configuration to a [`Storage`].
//!
//! [`RuntimeSink`] picks one of the two from an [`Environment`].

use std::fmt;
use std::io;

use thiserror::Error;

use crate::config::{
    ColorSettings, Configuration, ControlSurfaceSettings, PartialConfig, PersistenceSettings,
};
use crate::control::ControlHandler;
use crate::environment::Environment;
use crate::level::Level;

mod ansi;
mod storage;
mod styled;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub mod web;

pub use ansi::AnsiSink;
pub use storage::{MemoryStorage, Storage};
pub use styled::{Channel, Console, RecordingConsole, StyledLine, StyledSink, WriterConsole};

/// Failure reported by a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing to an output stream failed.
    #[error("failed to write log output: {0}")]
    Io(#[from] io::Error),
    /// The configuration could not be serialized.
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The persistent store rejected an operation.
    #[error("storage error: {0}")]
    Storage(String),
    /// The capability does not exist in this runtime.
    #[error("{0} is not available in this runtime")]
    Unavailable(&'static str),
}

/// A gated, formatted message on its way to the sink.
#[derive(Clone, Copy)]
pub struct Record<'a> {
    /// Severity of the message.
    pub level: Level,
    /// Message with timestamp and category prefixes applied.
    pub message: &'a str,
    /// Category the message was logged in.
    pub category: Option<&'a str>,
    /// Extra arguments supplied by the caller, untouched.
    pub args: &'a [&'a dyn fmt::Debug],
    /// Color settings in force.
    pub colors: &'a ColorSettings,
}

impl fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("level", &self.level)
            .field("message", &self.message)
            .field("category", &self.category)
            .field("args", &self.args.len())
            .finish_non_exhaustive()
    }
}

/// State a persistent sink saved during an earlier session.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SavedState {
    /// Saved configuration, applied as the highest-precedence layer.
    pub config: Option<PartialConfig>,
    /// Saved global switch.
    pub enabled: Option<bool>,
}

impl SavedState {
    /// Folds the saved values into a single update.
    #[must_use]
    pub fn into_update(self) -> PartialConfig {
        let mut update = self.config.unwrap_or_default();
        if let Some(enabled) = self.enabled {
            update.enabled = Some(enabled);
        }
        update
    }
}

/// Runtime-specific writer for accepted log events.
///
/// Only [`write`](Self::write) and [`write_stack`](Self::write_stack) are
/// required. Persistence and the control surface default to no-ops for
/// runtimes that have neither.
pub trait OutputSink {
    /// Writes one formatted message.
    fn write(&mut self, record: &Record<'_>) -> Result<(), SinkError>;

    /// Writes stack information belonging to the preceding error message.
    fn write_stack(&mut self, level: Level, stack: &str) -> Result<(), SinkError>;

    /// Loads state saved by [`persist`](Self::persist) in an earlier session.
    fn restore(&mut self, _settings: &PersistenceSettings) -> Option<SavedState> {
        None
    }

    /// Saves the configuration.
    fn persist(&mut self, _config: &Configuration) -> Result<(), SinkError> {
        Ok(())
    }

    /// Installs the runtime control surface, forwarding commands to
    /// `handler`.
    fn expose_control_surface(
        &mut self,
        _settings: &ControlSurfaceSettings,
        _handler: &ControlHandler,
    ) -> Result<(), SinkError> {
        Ok(())
    }
}

impl<S: OutputSink + ?Sized> OutputSink for Box<S> {
    fn write(&mut self, record: &Record<'_>) -> Result<(), SinkError> {
        (**self).write(record)
    }

    fn write_stack(&mut self, level: Level, stack: &str) -> Result<(), SinkError> {
        (**self).write_stack(level, stack)
    }

    fn restore(&mut self, settings: &PersistenceSettings) -> Option<SavedState> {
        (**self).restore(settings)
    }

    fn persist(&mut self, config: &Configuration) -> Result<(), SinkError> {
        (**self).persist(config)
    }

    fn expose_control_surface(
        &mut self,
        settings: &ControlSurfaceSettings,
        handler: &ControlHandler,
    ) -> Result<(), SinkError> {
        (**self).expose_control_surface(settings, handler)
    }
}

/// Styled sink used for browser runtimes on this target.
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type BrowserSink = StyledSink<web::BrowserConsole, web::LocalStorage>;

/// Styled sink used for browser runtimes on this target.
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type BrowserSink = StyledSink<WriterConsole<io::Stderr>, MemoryStorage>;

/// Escape-sequence sink writing to the process streams.
pub type ServerSink = AnsiSink<io::Stdout, io::Stderr>;

/// The sink matching the detected runtime.
#[derive(Debug)]
pub enum RuntimeSink {
    /// Styled-text output with persistence.
    Browser(BrowserSink),
    /// Escape-sequence output to stdout/stderr.
    Server(ServerSink),
}

impl RuntimeSink {
    /// Chooses the styled sink for browsers and the escape-sequence sink
    /// otherwise, including runtimes that are neither.
    #[must_use]
    pub fn for_environment(environment: &Environment) -> Self {
        if environment.is_browser() {
            Self::Browser(browser_sink())
        } else {
            Self::Server(AnsiSink::stdio())
        }
    }
}

#[cfg(all(target_arch = "wasm32", feature = "web"))]
fn browser_sink() -> BrowserSink {
    StyledSink::new(web::BrowserConsole, web::LocalStorage)
}

#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
fn browser_sink() -> BrowserSink {
    StyledSink::new(WriterConsole::stderr(), MemoryStorage::new())
}

impl OutputSink for RuntimeSink {
    fn write(&mut self, record: &Record<'_>) -> Result<(), SinkError> {
        match self {
            Self::Browser(sink) => sink.write(record),
            Self::Server(sink) => sink.write(record),
        }
    }

    fn write_stack(&mut self, level: Level, stack: &str) -> Result<(), SinkError> {
        match self {
            Self::Browser(sink) => sink.write_stack(level, stack),
            Self::Server(sink) => sink.write_stack(level, stack),
        }
    }

    fn restore(&mut self, settings: &PersistenceSettings) -> Option<SavedState> {
        match self {
            Self::Browser(sink) => sink.restore(settings),
            Self::Server(sink) => sink.restore(settings),
        }
    }

    fn persist(&mut self, config: &Configuration) -> Result<(), SinkError> {
        match self {
            Self::Browser(sink) => sink.persist(config),
            Self::Server(sink) => sink.persist(config),
        }
    }

    fn expose_control_surface(
        &mut self,
        settings: &ControlSurfaceSettings,
        handler: &ControlHandler,
    ) -> Result<(), SinkError> {
        match self {
            Self::Browser(sink) => sink.expose_control_surface(settings, handler),
            Self::Server(sink) => sink.expose_control_surface(settings, handler),
        }
    }
}
