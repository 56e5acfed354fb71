//! crates/logging/src/logger.rs
//! The logger: owns one resolver, one duplicate ledger and one sink.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use crate::clock::Clock;
use crate::config::{Configuration, PartialConfig};
use crate::control::{self, ControlCommand, ControlCommandError, ControlHandler, HELP};
use crate::environment::Environment;
use crate::event::{LogEvent, Payload};
use crate::format::format_message;
use crate::gate::{self, Decision, DuplicateLedger};
use crate::level::Level;
use crate::resolver::ConfigResolver;
use crate::sink::{OutputSink, Record, RuntimeSink};

mod builder;

pub use builder::LoggerBuilder;

/// Gating and configuration core in front of an [`OutputSink`].
///
/// Every logger owns its resolver and its duplicate ledger; two loggers never
/// observe each other's configuration or suppression history. Mutators take
/// `&mut self`, so sharing one logger between threads needs a lock (the
/// [default instance](crate::global) keeps one).
///
/// A logger serves a control surface only once it has a [`ControlHandler`]
/// bound to it, through [`serve_control`](Self::serve_control) or
/// [`into_shared`](Self::into_shared); the default instance binds its own.
///
/// Sink failures never fail a logging call. They are reported through
/// `tracing` under the `dualog::sink` target and the call still returns
/// [`Decision::Emitted`].
///
/// # Examples
///
/// ```
/// use dualog::sink::AnsiSink;
/// use dualog::{Decision, Environment, Level, Logger, PartialConfig};
///
/// let mut logger = Logger::builder()
///     .environment(Environment::from_parts(false, true, false))
///     .config(PartialConfig::new().show_timestamp(false))
///     .build(AnsiSink::new(Vec::new(), Vec::new()));
///
/// assert_eq!(logger.info("cache warmed", None), Decision::Suppressed);
/// assert_eq!(logger.warn("cache cold", Some("cache")), Decision::Emitted);
///
/// logger.enable_category("cache", None);
/// assert_eq!(logger.debug("hit ratio 0.93", Some("cache")), Decision::Emitted);
///
/// let (_, err) = logger.into_sink().into_inner();
/// assert_eq!(String::from_utf8(err).unwrap(), "[WARN] [cache] cache cold\n");
/// ```
pub struct Logger<S> {
    environment: Environment,
    resolver: ConfigResolver,
    ledger: DuplicateLedger,
    clock: Arc<dyn Clock>,
    sink: S,
    control: Option<ControlHandler>,
}

impl Logger<RuntimeSink> {
    /// Logger for the host runtime with the sink it calls for.
    #[must_use]
    pub fn detect() -> Self {
        LoggerBuilder::new().build_for_runtime()
    }

    /// Starts a builder.
    ///
    /// The builder is not tied to a sink type; [`LoggerBuilder::build`]
    /// accepts any [`OutputSink`] and
    /// [`LoggerBuilder::build_for_runtime`] picks a [`RuntimeSink`].
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl<S: OutputSink> Logger<S> {
    /// Logger for the host runtime writing to `sink`, with no caller
    /// configuration.
    pub fn new(sink: S) -> Self {
        LoggerBuilder::new().build(sink)
    }

    /// Logs `payload` at `DEBUG`.
    pub fn debug<'p>(&mut self, payload: impl Into<Payload<'p>>, category: Option<&str>) -> Decision {
        self.log(Level::Debug, payload, category, &[])
    }

    /// Logs `payload` at `INFO`.
    pub fn info<'p>(&mut self, payload: impl Into<Payload<'p>>, category: Option<&str>) -> Decision {
        self.log(Level::Info, payload, category, &[])
    }

    /// Logs `payload` at `WARN`.
    pub fn warn<'p>(&mut self, payload: impl Into<Payload<'p>>, category: Option<&str>) -> Decision {
        self.log(Level::Warn, payload, category, &[])
    }

    /// Logs `payload` at `ERROR`.
    ///
    /// An error payload's stack is written separately after the message when
    /// stack traces are enabled.
    pub fn error<'p>(&mut self, payload: impl Into<Payload<'p>>, category: Option<&str>) -> Decision {
        self.log(Level::Error, payload, category, &[])
    }

    /// Runs one call through the gate, the duplicate ledger, the formatter
    /// and the sink.
    ///
    /// `args` reach the sink untouched and do not take part in duplicate
    /// detection.
    pub fn log<'p>(
        &mut self,
        level: Level,
        payload: impl Into<Payload<'p>>,
        category: Option<&str>,
        args: &[&dyn fmt::Debug],
    ) -> Decision {
        let config = self.resolver.current();
        if !gate::should_emit(config, category, level) {
            return Decision::Suppressed;
        }

        let payload = payload.into();
        let now = self.clock.now();
        if self.ledger.is_duplicate(payload.text(), category, now) {
            return Decision::Duplicate;
        }

        let event = LogEvent {
            level,
            text: payload.text(),
            category,
            timestamp: now,
            args,
        };
        let message = format_message(config, &event);
        let record = Record {
            level,
            message: &message,
            category,
            args: event.args,
            colors: &config.colors,
        };
        if let Err(error) = self.sink.write(&record) {
            tracing::warn!(target: "dualog::sink", %error, %level, "failed to write log message");
        }

        if level == Level::Error && config.include_stack_trace {
            if let Some(stack) = payload.stack() {
                if let Err(error) = self.sink.write_stack(level, stack) {
                    tracing::warn!(target: "dualog::sink", %error, "failed to write stack trace");
                }
            }
        }

        Decision::Emitted
    }

    /// Sets the global minimum level.
    pub fn set_level(&mut self, level: Level) {
        self.resolver.set_level(level);
        self.persist();
    }

    /// Shallow-merges `update` into the effective configuration.
    ///
    /// Nested sections in `update` replace the current ones wholesale; see
    /// [`PartialConfig`]. Turning the control surface on installs it when a
    /// handler is bound, see [`serve_control`](Self::serve_control).
    pub fn update_config(&mut self, update: PartialConfig) {
        let exposed = self.resolver.current().control_surface.clone();
        self.resolver.update(update);
        let surface = &self.resolver.current().control_surface;
        if surface.enabled && *surface != exposed {
            self.expose_control_surface();
        }
        self.persist();
    }

    /// Enables `category` at `level`, `DEBUG` when `None`.
    pub fn enable_category(&mut self, category: &str, level: Option<Level>) {
        self.resolver
            .enable_category(category, level.unwrap_or(Level::Debug));
        self.persist();
    }

    /// Disables `category`.
    pub fn disable_category(&mut self, category: &str) {
        self.resolver.disable_category(category);
        self.persist();
    }

    /// Enables logging at `DEBUG` and every registered category.
    pub fn enable_all(&mut self) {
        self.resolver.enable_all();
        self.persist();
    }

    /// Clears the global switch; levels and categories are kept.
    pub fn disable_all(&mut self) {
        self.resolver.disable_all();
        self.persist();
    }

    /// Executes a parsed control command and returns its reply.
    pub fn apply_command(&mut self, command: &ControlCommand) -> Result<String, ControlCommandError> {
        let reply = match command {
            ControlCommand::EnableAll => {
                self.enable_all();
                "logging enabled at DEBUG".to_owned()
            }
            ControlCommand::DisableAll => {
                self.disable_all();
                "logging disabled".to_owned()
            }
            ControlCommand::SetLevel(level) => {
                self.set_level(*level);
                format!("level set to {level}")
            }
            ControlCommand::EnableCategory { name, level } => {
                self.enable_category(name, *level);
                format!(
                    "category {name} enabled at {}",
                    level.unwrap_or(Level::Debug)
                )
            }
            ControlCommand::DisableCategory(name) => {
                self.disable_category(name);
                format!("category {name} disabled")
            }
            ControlCommand::ShowConfig => serde_json::to_string_pretty(self.resolver.current())?,
            ControlCommand::Help => HELP.to_owned(),
        };
        Ok(reply)
    }

    /// Routes the control surface to `handler` and installs it when the
    /// surface is enabled.
    ///
    /// The handler is kept and reinstalled whenever
    /// [`update_config`](Self::update_config) changes the surface settings.
    pub fn serve_control(&mut self, handler: ControlHandler) {
        self.control = Some(handler);
        if self.resolver.current().control_surface.enabled {
            self.expose_control_surface();
        }
    }

    /// Parses `input` and executes it.
    pub fn execute(&mut self, input: &str) -> Result<String, ControlCommandError> {
        let command = input.parse::<ControlCommand>()?;
        self.apply_command(&command)
    }

    /// Copy of the effective configuration.
    #[must_use]
    pub fn config(&self) -> Configuration {
        self.resolver.config()
    }

    /// Reports the global switch.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.resolver.is_enabled()
    }

    /// Every level, least severe first.
    #[must_use]
    pub const fn levels(&self) -> &'static [Level] {
        &Level::ALL
    }

    /// Runtime classification fixed at construction.
    #[must_use]
    pub const fn environment(&self) -> Environment {
        self.environment
    }

    /// Borrows the sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrows the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Drops the logger and returns its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn expose_control_surface(&mut self) {
        let Some(handler) = &self.control else {
            return;
        };
        let settings = &self.resolver.current().control_surface;
        if let Err(error) = self.sink.expose_control_surface(settings, handler) {
            tracing::warn!(
                target: "dualog::control",
                namespace = %settings.namespace,
                %error,
                "failed to install control surface"
            );
        }
    }

    fn persist(&mut self) {
        let config = self.resolver.current();
        if !config.persistence.enabled {
            return;
        }
        if let Err(error) = self.sink.persist(config) {
            tracing::warn!(target: "dualog::sink", %error, "failed to persist configuration");
        }
    }
}

impl<S> fmt::Debug for Logger<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("environment", &self.environment)
            .field("config", self.resolver.current())
            .field("tracked_messages", &self.ledger.len())
            .field("serves_control", &self.control.is_some())
            .finish_non_exhaustive()
    }
}

impl<S: OutputSink + Send + 'static> Logger<S> {
    /// Moves the logger behind a lock and serves the control surface from it.
    ///
    /// The installed handler holds only a weak reference; once every
    /// [`Arc`] is dropped the surface answers that the logger is gone.
    pub fn into_shared(self) -> Arc<Mutex<Self>> {
        let shared = Arc::new(Mutex::new(self));
        let weak = Arc::downgrade(&shared);
        let handler: ControlHandler = Arc::new(move |input: &str| match weak.upgrade() {
            Some(logger) => {
                let result = logger
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .execute(input);
                control::reply(input, result)
            }
            None => "logger has been dropped".to_owned(),
        });
        shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .serve_control(handler);
        shared
    }
}
