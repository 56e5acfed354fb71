//! crates/logging/src/global.rs
//! Process-wide default logger and the free functions forwarding to it.
//!
//! The default instance is created on first use with [`Logger::detect`]: the
//! host runtime is classified, configuration comes from the defaults and the
//! environment variables, and the sink matches the runtime. It serves the
//! control surface, so in a development browser `window.dualog("help")`
//! reaches this instance. It lives for the rest of the process and is never
//! torn down.
//!
//! Nothing else shares its resolver or its duplicate ledger. Tests that need
//! isolation build their own [`Logger`] instead of going through these
//! functions.

use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use crate::config::{Configuration, PartialConfig};
use crate::control;
use crate::event::Payload;
use crate::gate::Decision;
use crate::level::Level;
use crate::logger::Logger;
use crate::sink::RuntimeSink;

static DEFAULT_LOGGER: LazyLock<Mutex<Logger<RuntimeSink>>> = LazyLock::new(|| {
    let mut logger = Logger::detect();
    logger.serve_control(Arc::new(|input: &str| {
        let result = default_logger().execute(input);
        control::reply(input, result)
    }));
    Mutex::new(logger)
});

/// Locks the default logger.
///
/// A panic while the lock was held does not poison it for later callers.
/// Holding the guard while calling one of the free functions in this module
/// deadlocks.
pub fn default_logger() -> MutexGuard<'static, Logger<RuntimeSink>> {
    DEFAULT_LOGGER
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Logs at `DEBUG` through the default logger.
pub fn debug<'p>(payload: impl Into<Payload<'p>>, category: Option<&str>) -> Decision {
    default_logger().debug(payload, category)
}

/// Logs at `INFO` through the default logger.
pub fn info<'p>(payload: impl Into<Payload<'p>>, category: Option<&str>) -> Decision {
    default_logger().info(payload, category)
}

/// Logs at `WARN` through the default logger.
pub fn warn<'p>(payload: impl Into<Payload<'p>>, category: Option<&str>) -> Decision {
    default_logger().warn(payload, category)
}

/// Logs at `ERROR` through the default logger.
pub fn error<'p>(payload: impl Into<Payload<'p>>, category: Option<&str>) -> Decision {
    default_logger().error(payload, category)
}

/// Sets the default logger's global level.
pub fn set_level(level: Level) {
    default_logger().set_level(level);
}

/// Applies `update` to the default logger.
pub fn update_config(update: PartialConfig) {
    default_logger().update_config(update);
}

/// Enables `category` on the default logger.
pub fn enable_category(category: &str, level: Option<Level>) {
    default_logger().enable_category(category, level);
}

/// Disables `category` on the default logger.
pub fn disable_category(category: &str) {
    default_logger().disable_category(category);
}

/// Enables everything on the default logger.
pub fn enable_all() {
    default_logger().enable_all();
}

/// Clears the default logger's global switch.
pub fn disable_all() {
    default_logger().disable_all();
}

/// Copy of the default logger's configuration.
#[must_use]
pub fn config() -> Configuration {
    default_logger().config()
}

/// Reports the default logger's global switch.
#[must_use]
pub fn is_enabled() -> bool {
    default_logger().is_enabled()
}

/// Every level, least severe first.
#[must_use]
pub const fn levels() -> &'static [Level] {
    &Level::ALL
}
