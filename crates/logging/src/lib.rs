#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `dualog` is a logging facade that behaves correctly in a browser and in a
//! server process. It classifies the runtime once, resolves a configuration
//! whose defaults follow that classification, and gates every call before a
//! runtime-specific sink writes it.
//!
//! # Design
//!
//! - [`Environment`] places the runtime on two axes: browser or server, and
//!   development or production.
//! - [`ConfigResolver`] layers runtime-aware defaults, `DUALOG_*` environment
//!   variables and caller configuration ([`PartialConfig`]), in that order of
//!   precedence.
//! - [`gate::should_emit`] applies the global switch, category overrides and
//!   thresholds; [`DuplicateLedger`] drops identical messages repeated within
//!   one second.
//! - [`format::format_message`] adds the timestamp and category prefixes.
//! - An [`OutputSink`](sink::OutputSink) renders the result: escape-sequence
//!   colors on servers, `%c` styled console lines and persisted configuration
//!   in browsers.
//!
//! [`Logger`] ties these together. The [`global`] module holds the
//! process-wide default instance and free functions that forward to it.
//!
//! # Invariants
//!
//! - A `SILENT` threshold suppresses every message, `ERROR` included.
//! - A disabled global switch suppresses every message regardless of
//!   category overrides.
//! - Configuration handed out by a logger is a copy.
//! - Sink failures never fail a logging call; they are reported through
//!   `tracing` under `dualog::` targets.
//!
//! # Examples
//!
//! ```
//! use dualog::sink::AnsiSink;
//! use dualog::{ColorSettings, Environment, Level, Logger, PartialConfig};
//!
//! let mut logger = Logger::builder()
//!     .environment(Environment::from_parts(false, true, true))
//!     .config(
//!         PartialConfig::new()
//!             .show_timestamp(false)
//!             .colors(ColorSettings::with_enabled(false)),
//!     )
//!     .build(AnsiSink::new(Vec::new(), Vec::new()));
//!
//! logger.set_level(Level::Warn);
//! logger.info("not shown", None);
//! logger.error("disk full", Some("storage"));
//!
//! let (out, err) = logger.into_sink().into_inner();
//! assert!(out.is_empty());
//! assert_eq!(err, b"[ERROR] [storage] disk full\n");
//! ```
//!
//! # See also
//!
//! - [`control`] for the textual commands of the runtime control surface.
//! - [`log_at!`], [`debug_log!`], [`info_log!`], [`warn_log!`] and
//!   [`error_log!`] for formatting shorthands over the default instance.

mod clock;
pub mod config;
pub mod control;
mod environment;
mod event;
pub mod format;
pub mod gate;
pub mod global;
mod level;
mod logger;
mod macros;
mod resolver;
pub mod sink;
#[cfg(feature = "tracing-bridge")]
mod tracing_bridge;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    CategoryConfig, ColorSettings, Configuration, ControlSurfaceSettings, Palette, PartialConfig,
    PersistenceSettings,
};
pub use control::{ControlCommand, ControlCommandError, ControlHandler};
pub use environment::{Environment, HostRuntime, MODE_VAR, PRODUCTION_MODE, Runtime, StaticRuntime};
pub use event::{ErrorPayload, LogEvent, Payload};
pub use gate::{Decision, DuplicateLedger};
pub use global::default_logger;
pub use level::{Level, ParseLevelError};
pub use logger::{Logger, LoggerBuilder};
pub use resolver::ConfigResolver;
#[cfg(feature = "tracing-bridge")]
pub use tracing_bridge::{DualogLayer, init_tracing, init_tracing_with_filter};
