//! crates/logging/src/macros.rs
//! Formatting macros that log through the default logger.
//!
//! Each macro takes `format!` arguments, optionally preceded by
//! `category: <expr>,`, and evaluates to the call's
//! [`Decision`](crate::Decision).

/// Logs a formatted message at the given level through the default logger.
///
/// # Example
/// ```
/// use dualog::{Level, log_at};
///
/// log_at!(Level::Info, category: "boot", "listening on port {}", 8080);
/// log_at!(Level::Debug, "configuration loaded");
/// ```
#[macro_export]
macro_rules! log_at {
    ($level:expr, category: $category:expr, $($arg:tt)+) => {
        $crate::global::default_logger().log(
            $level,
            ::std::format!($($arg)+),
            ::std::option::Option::Some($category),
            &[],
        )
    };
    ($level:expr, $($arg:tt)+) => {
        $crate::global::default_logger().log(
            $level,
            ::std::format!($($arg)+),
            ::std::option::Option::None,
            &[],
        )
    };
}

/// Logs at `DEBUG` through the default logger.
///
/// # Example
/// ```ignore
/// debug_log!(category: "cache", "evicted {} entries", count);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)+) => {
        $crate::log_at!($crate::Level::Debug, $($arg)+)
    };
}

/// Logs at `INFO` through the default logger.
///
/// # Example
/// ```ignore
/// info_log!("user {} signed in", user);
/// ```
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)+) => {
        $crate::log_at!($crate::Level::Info, $($arg)+)
    };
}

/// Logs at `WARN` through the default logger.
///
/// # Example
/// ```ignore
/// warn_log!(category: "http", "slow response: {} ms", elapsed);
/// ```
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)+) => {
        $crate::log_at!($crate::Level::Warn, $($arg)+)
    };
}

/// Logs at `ERROR` through the default logger.
///
/// # Example
/// ```ignore
/// error_log!(category: "db", "query failed: {}", err);
/// ```
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)+) => {
        $crate::log_at!($crate::Level::Error, $($arg)+)
    };
}
