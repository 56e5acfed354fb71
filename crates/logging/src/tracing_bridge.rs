//! crates/logging/src/tracing_bridge.rs
//! Bridge from the tracing crate into a dualog logger.
//!
//! [`DualogLayer`] is a `tracing-subscriber` layer that hands every event to a
//! [`Logger`]: the event target becomes the category and the tracing level is
//! folded onto the four message levels. The logger then gates, deduplicates
//! and formats the event like any direct call.
//!
//! Events whose target starts with `dualog` are dropped. Those are the
//! logger's own diagnostics, and forwarding them would re-enter the logger
//! while it is locked.
//!
//! # Usage
//!
//! ```rust,ignore
//! dualog::init_tracing();
//!
//! tracing::info!(target: "http", "listening on {}", addr);
//! tracing::debug!(target: "db", rows = 12, "query finished");
//! ```

use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::Subscriber;
use tracing::field::{Field, Visit};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use crate::level::Level;
use crate::logger::Logger;
use crate::sink::OutputSink;

type Forward = dyn Fn(Level, String, &str) + Send + Sync;

/// Tracing layer forwarding events to a dualog logger.
pub struct DualogLayer {
    forward: Box<Forward>,
}

impl DualogLayer {
    /// Layer forwarding to the [default logger](crate::global).
    #[must_use]
    pub fn new() -> Self {
        Self {
            forward: Box::new(|level, message, category| {
                crate::global::default_logger().log(level, message, Some(category), &[]);
            }),
        }
    }

    /// Layer forwarding to a shared logger.
    #[must_use]
    pub fn with_logger<S>(logger: Arc<Mutex<Logger<S>>>) -> Self
    where
        S: OutputSink + Send + 'static,
    {
        Self {
            forward: Box::new(move |level, message, category| {
                logger
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .log(level, message, Some(category), &[]);
            }),
        }
    }

    /// Maps a tracing level onto a message level.
    #[must_use]
    pub const fn map_level(level: tracing::Level) -> Level {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }

    fn is_own_target(target: &str) -> bool {
        target.starts_with("dualog")
    }
}

impl Default for DualogLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DualogLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DualogLayer").finish_non_exhaustive()
    }
}

impl<S> Layer<S> for DualogLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if Self::is_own_target(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        (self.forward)(
            Self::map_level(*metadata.level()),
            visitor.finish(),
            metadata.target(),
        );
    }
}

/// Collects the `message` field followed by the other fields as `key=value`.
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn finish(mut self) -> String {
        if self.message.is_empty() {
            return self.fields;
        }
        if !self.fields.is_empty() {
            self.message.push(' ');
            self.message.push_str(&self.fields);
        }
        self.message
    }

    fn push_field(&mut self, field: &Field, value: fmt::Arguments<'_>) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        // Writing to a String cannot fail.
        let _ = write!(self.fields, "{}={value}", field.name());
    }
}

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_field(field, format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.push_field(field, format_args!("{value}"));
        }
    }
}

/// Installs a registry with a [`DualogLayer`] forwarding to the default
/// logger as the global tracing subscriber.
///
/// Does nothing when a global subscriber is already set.
pub fn init_tracing() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(DualogLayer::new())
        .try_init();
}

/// Like [`init_tracing`] with an additional filter layer in front.
///
/// # Example
///
/// ```rust,ignore
/// use tracing_subscriber::EnvFilter;
///
/// dualog::init_tracing_with_filter(EnvFilter::from_default_env());
/// ```
pub fn init_tracing_with_filter<F>(filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(DualogLayer::new())
        .try_init();
}
