use std::io::{self, Write};

use super::{OutputSink, Record, SinkError};
use crate::level::Level;

const RESET: &str = "\x1b[0m";

/// Server sink writing escape-sequence colored lines.
///
/// `DEBUG` and `INFO` lines go to the `out` writer, `WARN` and `ERROR` lines
/// and stack traces to the `err` writer. Each line reads
/// `[LEVEL] <message>` followed by the caller's extra arguments in their
/// `Debug` form. When colors are enabled the line is wrapped in
/// `ESC[<code>m … ESC[0m` using the ANSI palette entry for the level.
///
/// # Examples
///
/// ```
/// use dualog::sink::{AnsiSink, OutputSink, Record};
/// use dualog::{ColorSettings, Level};
///
/// let mut sink = AnsiSink::new(Vec::new(), Vec::new());
/// let colors = ColorSettings::with_enabled(false);
/// sink.write(&Record {
///     level: Level::Info,
///     message: "ready",
///     category: None,
///     args: &[&42],
///     colors: &colors,
/// })?;
///
/// let (out, err) = sink.into_inner();
/// assert_eq!(out, b"[INFO] ready 42\n");
/// assert!(err.is_empty());
/// # Ok::<(), dualog::sink::SinkError>(())
/// ```
#[derive(Clone, Debug)]
pub struct AnsiSink<O, E> {
    out: O,
    err: E,
}

impl AnsiSink<io::Stdout, io::Stderr> {
    /// Sink writing to the process's standard streams.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O, E> AnsiSink<O, E> {
    /// Sink writing to the given streams.
    #[must_use]
    pub const fn new(out: O, err: E) -> Self {
        Self { out, err }
    }

    /// Borrows the stream used for `DEBUG` and `INFO`.
    #[must_use]
    pub const fn out(&self) -> &O {
        &self.out
    }

    /// Borrows the stream used for `WARN`, `ERROR` and stacks.
    #[must_use]
    pub const fn err(&self) -> &E {
        &self.err
    }

    /// Returns both streams.
    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> AnsiSink<O, E> {
    fn stream(&mut self, level: Level) -> &mut dyn Write {
        match level {
            Level::Debug | Level::Info => &mut self.out,
            Level::Warn | Level::Error | Level::Silent => &mut self.err,
        }
    }
}

/// Renders the line written for `record`, without the trailing newline.
pub(super) fn render_line(record: &Record<'_>) -> String {
    let mut line = format!("[{}] {}", record.level, record.message);
    for arg in record.args {
        line.push(' ');
        line.push_str(&format!("{arg:?}"));
    }

    match record.colors.ansi.get(record.level) {
        Some(code) if record.colors.enabled => format!("\x1b[{code}m{line}{RESET}"),
        _ => line,
    }
}

impl<O: Write, E: Write> OutputSink for AnsiSink<O, E> {
    fn write(&mut self, record: &Record<'_>) -> Result<(), SinkError> {
        let line = render_line(record);
        let stream = self.stream(record.level);
        writeln!(stream, "{line}")?;
        stream.flush()?;
        Ok(())
    }

    fn write_stack(&mut self, _level: Level, stack: &str) -> Result<(), SinkError> {
        writeln!(self.err, "{stack}")?;
        self.err.flush()?;
        Ok(())
    }
}
