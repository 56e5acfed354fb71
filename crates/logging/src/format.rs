//! crates/logging/src/format.rs
//! Message formatting: timestamp and category prefixes.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::config::Configuration;
use crate::event::LogEvent;

/// `2024-03-01T09:15:02.120Z`
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

/// Renders `instant` as an ISO-8601 UTC timestamp with millisecond precision.
pub fn format_timestamp(instant: OffsetDateTime) -> String {
    let utc = instant.to_offset(UtcOffset::UTC);
    utc.format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| utc.unix_timestamp().to_string())
}

/// Builds the message string handed to the sink.
///
/// The timestamp prefix is present when `show_timestamp` is on; the category
/// prefix whenever the event has a non-empty category.
///
/// ```
/// use dualog::format::format_message;
/// use dualog::{Configuration, Environment, Level, LogEvent};
/// use time::OffsetDateTime;
///
/// let mut config = Configuration::defaults_for(&Environment::from_parts(false, true, true));
/// let event = LogEvent {
///     level: Level::Info,
///     text: "listening",
///     category: Some("http"),
///     timestamp: OffsetDateTime::UNIX_EPOCH,
///     args: &[],
/// };
/// assert_eq!(
///     format_message(&config, &event),
///     "[1970-01-01T00:00:00.000Z] [http] listening"
/// );
///
/// config.show_timestamp = false;
/// assert_eq!(format_message(&config, &event), "[http] listening");
/// ```
pub fn format_message(config: &Configuration, event: &LogEvent<'_>) -> String {
    let mut message = String::with_capacity(event.text.len() + 40);

    if config.show_timestamp {
        message.push('[');
        message.push_str(&format_timestamp(event.timestamp));
        message.push_str("] ");
    }

    if let Some(category) = event.category.filter(|category| !category.is_empty()) {
        message.push('[');
        message.push_str(category);
        message.push_str("] ");
    }

    message.push_str(event.text);
    message
}
