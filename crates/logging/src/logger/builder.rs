use std::fmt;
use std::sync::Arc;

use super::Logger;
use crate::clock::{Clock, SystemClock};
use crate::config::PartialConfig;
use crate::environment::{Environment, HostRuntime, Runtime};
use crate::gate::DuplicateLedger;
use crate::resolver::ConfigResolver;
use crate::sink::{OutputSink, RuntimeSink};

/// Assembles a [`Logger`].
///
/// Unset parts fall back to the host: [`HostRuntime`] for variables,
/// [`Environment::detect_with`] on that runtime for the classification, and
/// [`SystemClock`] for time.
///
/// Building resolves the configuration and restores persisted state over it
/// when persistence is enabled. The control surface is left to
/// [`Logger::serve_control`] and [`Logger::into_shared`], which bind it to a
/// logger that outlives the call.
#[derive(Default)]
pub struct LoggerBuilder {
    environment: Option<Environment>,
    runtime: Option<Box<dyn Runtime>>,
    config: Option<PartialConfig>,
    clock: Option<Arc<dyn Clock>>,
}

impl LoggerBuilder {
    /// Builder with every part unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the runtime classification instead of detecting it.
    #[must_use]
    pub const fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Probe used for detection and environment-variable overrides.
    #[must_use]
    pub fn runtime(mut self, runtime: impl Runtime + 'static) -> Self {
        self.runtime = Some(Box::new(runtime));
        self
    }

    /// Caller configuration, applied above environment variables.
    #[must_use]
    pub fn config(mut self, config: PartialConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Time source for timestamps and duplicate suppression.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Builds a logger with the sink matching the environment.
    #[must_use]
    pub fn build_for_runtime(self) -> Logger<RuntimeSink> {
        let runtime = self.runtime.as_deref().unwrap_or(&HostRuntime);
        let environment = self
            .environment
            .unwrap_or_else(|| Environment::detect_with(runtime));
        let sink = RuntimeSink::for_environment(&environment);
        self.environment(environment).build(sink)
    }

    /// Builds a logger writing to `sink`.
    pub fn build<S: OutputSink>(self, mut sink: S) -> Logger<S> {
        let runtime = self.runtime.as_deref().unwrap_or(&HostRuntime);
        let environment = self
            .environment
            .unwrap_or_else(|| Environment::detect_with(runtime));

        let mut resolver = ConfigResolver::new(&environment, runtime, self.config);

        let persistence = &resolver.current().persistence;
        if persistence.enabled {
            if let Some(saved) = sink.restore(persistence) {
                tracing::debug!(target: "dualog::sink", "restored persisted configuration");
                resolver.update(saved.into_update());
            }
        }

        Logger {
            environment,
            resolver,
            ledger: DuplicateLedger::new(),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            sink,
            control: None,
        }
    }
}

impl fmt::Debug for LoggerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerBuilder")
            .field("environment", &self.environment)
            .field("runtime", &self.runtime.is_some())
            .field("config", &self.config)
            .field("clock", &self.clock.is_some())
            .finish()
    }
}
