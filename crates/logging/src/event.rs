//! crates/logging/src/event.rs
//! Log payloads and the ephemeral event built for each accepted call.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::borrow::Cow;
use std::error::Error;
use std::fmt::{self, Write as _};

use time::OffsetDateTime;

use crate::level::Level;

/// Error-like payload: a description plus optional stack information.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorPayload {
    description: String,
    stack: Option<String>,
}

impl ErrorPayload {
    /// Payload without stack information.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            stack: None,
        }
    }

    /// Attaches stack text.
    #[must_use]
    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    /// Builds a payload from `error`, using its source chain as the stack.
    ///
    /// An error without sources carries no stack.
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut payload = Self::new(error.to_string());
        let mut chain = String::new();
        let mut source = error.source();
        while let Some(cause) = source {
            if !chain.is_empty() {
                chain.push('\n');
            }
            // Writing to a String cannot fail.
            let _ = write!(chain, "caused by: {cause}");
            source = cause.source();
        }
        if !chain.is_empty() {
            payload.stack = Some(chain);
        }
        payload
    }

    /// Builds a payload from `error` with a backtrace of the calling thread.
    ///
    /// The stack is present only when the standard library actually captured
    /// one, which depends on `RUST_BACKTRACE`/`RUST_LIB_BACKTRACE`.
    pub fn capture(error: &(dyn Error + 'static)) -> Self {
        let backtrace = Backtrace::capture();
        let mut payload = Self::new(error.to_string());
        if backtrace.status() == BacktraceStatus::Captured {
            payload.stack = Some(backtrace.to_string());
        }
        payload
    }

    /// Displayable text of the error.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stack information, if any.
    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }
}

/// What a caller logs: text or an error-like value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Payload<'a> {
    /// Plain message text.
    Text(Cow<'a, str>),
    /// Error-like value; its description is the message text.
    Error(ErrorPayload),
}

impl Payload<'_> {
    /// Text used for output and for duplicate detection.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text.as_ref(),
            Self::Error(error) => error.description(),
        }
    }

    /// Stack information carried by an error payload.
    #[must_use]
    pub fn stack(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Error(error) => error.stack(),
        }
    }
}

impl<'a> From<&'a str> for Payload<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(Cow::Borrowed(text))
    }
}

impl From<String> for Payload<'_> {
    fn from(text: String) -> Self {
        Self::Text(Cow::Owned(text))
    }
}

impl<'a> From<&'a String> for Payload<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(Cow::Borrowed(text.as_str()))
    }
}

impl From<fmt::Arguments<'_>> for Payload<'_> {
    fn from(args: fmt::Arguments<'_>) -> Self {
        Self::Text(Cow::Owned(args.to_string()))
    }
}

impl From<ErrorPayload> for Payload<'_> {
    fn from(error: ErrorPayload) -> Self {
        Self::Error(error)
    }
}

impl From<&(dyn Error + 'static)> for Payload<'_> {
    fn from(error: &(dyn Error + 'static)) -> Self {
        Self::Error(ErrorPayload::from_error(error))
    }
}

/// A single accepted log call, alive only while it is formatted and written.
#[derive(Clone, Copy, Debug)]
pub struct LogEvent<'a> {
    /// Severity of the call.
    pub level: Level,
    /// Message text (the description for error payloads).
    pub text: &'a str,
    /// Category the call was made in.
    pub category: Option<&'a str>,
    /// Instant the call was accepted.
    pub timestamp: OffsetDateTime,
    /// Extra positional arguments, passed to the sink untouched.
    pub args: &'a [&'a dyn fmt::Debug],
}
