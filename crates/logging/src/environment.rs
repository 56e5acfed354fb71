//! crates/logging/src/environment.rs
//! Runtime classification: browser or server, development or production.
//!
//! The ambient runtime is read through the [`Runtime`] probe so the
//! classification rules can be exercised without a browser or a mutated
//! process environment. [`HostRuntime`] answers for the real process and
//! [`StaticRuntime`] answers from fixed values.

use std::collections::HashMap;

/// Variable holding the declared deployment mode.
pub const MODE_VAR: &str = "APP_ENV";

/// Declared mode that switches the environment to production.
pub const PRODUCTION_MODE: &str = "production";

/// Read access to the ambient runtime.
pub trait Runtime {
    /// Reports whether a window-like global object exists.
    fn has_window(&self) -> bool;

    /// Reports whether a process-like global exists.
    fn has_process(&self) -> bool;

    /// Looks up a configuration variable.
    fn var(&self, name: &str) -> Option<String>;

    /// Declared deployment mode, read from [`MODE_VAR`].
    fn declared_mode(&self) -> Option<String> {
        self.var(MODE_VAR)
    }
}

/// Probe backed by the running process.
///
/// On native targets the process always exists and variables come from
/// [`std::env`]. On `wasm32` a window exists when the `web` feature is
/// enabled and `web_sys::window()` yields one; the only process-like signal is
/// an `APP_ENV` value baked in at compile time.
#[derive(Clone, Copy, Debug, Default)]
pub struct HostRuntime;

impl Runtime for HostRuntime {
    fn has_window(&self) -> bool {
        #[cfg(all(target_arch = "wasm32", feature = "web"))]
        {
            web_sys::window().is_some()
        }
        #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
        {
            false
        }
    }

    fn has_process(&self) -> bool {
        if cfg!(target_arch = "wasm32") {
            option_env!("APP_ENV").is_some()
        } else {
            true
        }
    }

    fn var(&self, name: &str) -> Option<String> {
        if cfg!(target_arch = "wasm32") {
            return None;
        }
        std::env::var(name).ok()
    }

    fn declared_mode(&self) -> Option<String> {
        if cfg!(target_arch = "wasm32") {
            return option_env!("APP_ENV").map(str::to_owned);
        }
        self.var(MODE_VAR)
    }
}

/// Probe answering from fixed values.
///
/// # Examples
///
/// ```
/// use dualog::{Environment, StaticRuntime};
///
/// let runtime = StaticRuntime::server().with_var("APP_ENV", "production");
/// let env = Environment::detect_with(&runtime);
/// assert!(env.is_server());
/// assert!(env.is_production());
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticRuntime {
    window: bool,
    process: bool,
    vars: HashMap<String, String>,
}

impl StaticRuntime {
    /// A runtime with neither a window nor a process.
    #[must_use]
    pub fn bare() -> Self {
        Self::default()
    }

    /// A runtime with a process and no window.
    #[must_use]
    pub fn server() -> Self {
        Self {
            process: true,
            ..Self::default()
        }
    }

    /// A runtime with a window and no process.
    #[must_use]
    pub fn browser() -> Self {
        Self {
            window: true,
            ..Self::default()
        }
    }

    /// Sets whether a window-like object exists.
    #[must_use]
    pub fn with_window(mut self, window: bool) -> Self {
        self.window = window;
        self
    }

    /// Sets whether a process-like global exists.
    #[must_use]
    pub fn with_process(mut self, process: bool) -> Self {
        self.process = process;
        self
    }

    /// Adds a variable visible through [`Runtime::var`].
    #[must_use]
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl Runtime for StaticRuntime {
    fn has_window(&self) -> bool {
        self.window
    }

    fn has_process(&self) -> bool {
        self.process
    }

    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Classification of the runtime along two independent axes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Environment {
    browser: bool,
    server: bool,
    development: bool,
}

impl Environment {
    /// Classifies the running process.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with(&HostRuntime)
    }

    /// Classifies the runtime described by `runtime`.
    ///
    /// Never fails: a runtime with neither a window nor a process is reported
    /// as neither browser nor server, in development mode.
    pub fn detect_with(runtime: &dyn Runtime) -> Self {
        let browser = runtime.has_window();
        let process = runtime.has_process();
        let server = !browser && process;
        let production =
            process && runtime.declared_mode().as_deref() == Some(PRODUCTION_MODE);

        Self {
            browser,
            server,
            development: !production,
        }
    }

    /// Builds a descriptor from explicit values.
    #[must_use]
    pub const fn from_parts(browser: bool, server: bool, development: bool) -> Self {
        Self {
            browser,
            server,
            development,
        }
    }

    /// Running with a window-like global.
    #[must_use]
    pub const fn is_browser(&self) -> bool {
        self.browser
    }

    /// Running in a process without a window.
    #[must_use]
    pub const fn is_server(&self) -> bool {
        self.server
    }

    /// Development mode (the default when no mode is declared).
    #[must_use]
    pub const fn is_development(&self) -> bool {
        self.development
    }

    /// Production mode.
    #[must_use]
    pub const fn is_production(&self) -> bool {
        !self.development
    }
}
