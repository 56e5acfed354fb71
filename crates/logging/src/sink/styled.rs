use std::fmt;
use std::io::{self, Write};

use super::{OutputSink, Record, SavedState, SinkError, Storage};
use crate::config::{Configuration, ControlSurfaceSettings, PartialConfig, PersistenceSettings};
use crate::control::ControlHandler;
use crate::level::Level;

/// Console method a line is sent to.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Channel {
    /// `console.debug`
    Debug,
    /// `console.info`
    Info,
    /// `console.warn`
    Warn,
    /// `console.error`
    Error,
}

impl Channel {
    /// Channel used for messages at `level`.
    #[must_use]
    pub const fn for_level(level: Level) -> Self {
        match level {
            Level::Debug => Self::Debug,
            Level::Info => Self::Info,
            Level::Warn => Self::Warn,
            Level::Error | Level::Silent => Self::Error,
        }
    }
}

/// One console call: a format string with `%c` directives, the CSS for each
/// directive, and the caller's extra arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StyledLine {
    /// Console method.
    pub channel: Channel,
    /// Format string; may contain `%c` directives.
    pub format: String,
    /// One CSS declaration per `%c`.
    pub styles: Vec<String>,
    /// Extra arguments in their `Debug` form.
    pub args: Vec<String>,
}

impl StyledLine {
    /// Format string with the `%c` directives removed.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.format.replace("%c", "")
    }
}

/// Destination of styled lines.
pub trait Console {
    /// Performs one console call.
    fn emit(&mut self, line: &StyledLine) -> Result<(), SinkError>;
}

/// Console that keeps every line in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingConsole {
    lines: Vec<StyledLine>,
}

impl RecordingConsole {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines emitted so far.
    #[must_use]
    pub fn lines(&self) -> &[StyledLine] {
        &self.lines
    }

    /// Removes and returns the recorded lines.
    pub fn take(&mut self) -> Vec<StyledLine> {
        std::mem::take(&mut self.lines)
    }
}

impl Console for RecordingConsole {
    fn emit(&mut self, line: &StyledLine) -> Result<(), SinkError> {
        self.lines.push(line.clone());
        Ok(())
    }
}

/// Console printing plain text to a writer, styles dropped.
#[derive(Debug)]
pub struct WriterConsole<W> {
    writer: W,
}

impl<W> WriterConsole<W> {
    /// Console writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Console for WriterConsole<W> {
    fn emit(&mut self, line: &StyledLine) -> Result<(), SinkError> {
        let mut text = line.plain_text();
        for arg in &line.args {
            text.push(' ');
            text.push_str(arg);
        }
        writeln!(self.writer, "{text}")?;
        self.writer.flush().map_err(SinkError::from)
    }
}

/// Browser sink: styled console lines plus key/value persistence.
///
/// Messages render as `%c[LEVEL] <message>` with `color: <css>` taken from
/// the styled palette when colors are enabled, and as `[LEVEL] <message>`
/// otherwise. Configuration is saved under `<prefix>_config` (JSON) and
/// `<prefix>_enabled` (`"true"` or `"false"`).
pub struct StyledSink<C, S> {
    console: C,
    storage: S,
    control: Option<(String, ControlHandler)>,
}

impl<C: Console, S: Storage> StyledSink<C, S> {
    /// Sink writing to `console` and persisting to `storage`.
    pub const fn new(console: C, storage: S) -> Self {
        Self {
            console,
            storage,
            control: None,
        }
    }

    /// Borrows the console.
    pub const fn console(&self) -> &C {
        &self.console
    }

    /// Mutably borrows the console.
    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Borrows the store.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Namespace the control surface was installed under, if any.
    pub fn control_namespace(&self) -> Option<&str> {
        self.control.as_ref().map(|(namespace, _)| namespace.as_str())
    }

    /// Handler behind the installed control surface.
    pub fn control_handler(&self) -> Option<ControlHandler> {
        self.control.as_ref().map(|(_, handler)| handler.clone())
    }

    /// Returns the console and the store.
    pub fn into_parts(self) -> (C, S) {
        (self.console, self.storage)
    }
}

impl<C: fmt::Debug, S: fmt::Debug> fmt::Debug for StyledSink<C, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyledSink")
            .field("console", &self.console)
            .field("storage", &self.storage)
            .field("control_namespace", &self.control.as_ref().map(|(namespace, _)| namespace.as_str()))
            .finish()
    }
}

/// Builds the console call for `record`.
pub(super) fn render_line(record: &Record<'_>) -> StyledLine {
    let text = format!("[{}] {}", record.level, record.message);
    let args = record.args.iter().map(|arg| format!("{arg:?}")).collect();

    match record.colors.styled.get(record.level) {
        Some(color) if record.colors.enabled => StyledLine {
            channel: Channel::for_level(record.level),
            format: format!("%c{text}"),
            styles: vec![format!("color: {color}")],
            args,
        },
        _ => StyledLine {
            channel: Channel::for_level(record.level),
            format: text,
            styles: Vec::new(),
            args,
        },
    }
}

impl<C: Console, S: Storage> OutputSink for StyledSink<C, S> {
    fn write(&mut self, record: &Record<'_>) -> Result<(), SinkError> {
        self.console.emit(&render_line(record))
    }

    fn write_stack(&mut self, level: Level, stack: &str) -> Result<(), SinkError> {
        self.console.emit(&StyledLine {
            channel: Channel::for_level(level),
            format: stack.replace('%', "%%"),
            styles: Vec::new(),
            args: Vec::new(),
        })
    }

    fn restore(&mut self, settings: &PersistenceSettings) -> Option<SavedState> {
        let config_key = settings.config_key();
        let config = match self.storage.get(&config_key) {
            Ok(Some(json)) => match serde_json::from_str::<PartialConfig>(&json) {
                Ok(config) => Some(config),
                Err(error) => {
                    tracing::warn!(
                        target: "dualog::sink",
                        key = %config_key,
                        %error,
                        "ignoring malformed persisted configuration"
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(
                    target: "dualog::sink",
                    key = %config_key,
                    %error,
                    "failed to read persisted configuration"
                );
                None
            }
        };

        let enabled_key = settings.enabled_key();
        let enabled = match self.storage.get(&enabled_key) {
            Ok(value) => value.map(|value| value == "true"),
            Err(error) => {
                tracing::warn!(
                    target: "dualog::sink",
                    key = %enabled_key,
                    %error,
                    "failed to read persisted switch"
                );
                None
            }
        };

        if config.is_none() && enabled.is_none() {
            return None;
        }
        Some(SavedState { config, enabled })
    }

    fn persist(&mut self, config: &Configuration) -> Result<(), SinkError> {
        let json = serde_json::to_string(config)?;
        self.storage.set(&config.persistence.config_key(), &json)?;
        self.storage.set(
            &config.persistence.enabled_key(),
            if config.enabled { "true" } else { "false" },
        )
    }

    fn expose_control_surface(
        &mut self,
        settings: &ControlSurfaceSettings,
        handler: &ControlHandler,
    ) -> Result<(), SinkError> {
        #[cfg(all(target_arch = "wasm32", feature = "web"))]
        super::web::install_control_surface(&settings.namespace, handler.clone())?;

        self.control = Some((settings.namespace.clone(), handler.clone()));
        Ok(())
    }
}

impl WriterConsole<io::Stderr> {
    /// Console printing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColorSettings;
    use crate::environment::Environment;
    use crate::sink::MemoryStorage;

    fn sink() -> StyledSink<RecordingConsole, MemoryStorage> {
        StyledSink::new(RecordingConsole::new(), MemoryStorage::new())
    }

    fn record<'a>(level: Level, colors: &'a ColorSettings) -> Record<'a> {
        Record {
            level,
            message: "[cart] item added",
            category: Some("cart"),
            args: &[],
            colors,
        }
    }

    #[test]
    fn colored_line_uses_css_directive() {
        let colors = ColorSettings::with_enabled(true);
        let line = render_line(&record(Level::Info, &colors));
        assert_eq!(line.channel, Channel::Info);
        assert_eq!(line.format, "%c[INFO] [cart] item added");
        assert_eq!(line.styles, vec!["color: #2980b9".to_owned()]);
    }

    #[test]
    fn uncolored_line_has_no_directive() {
        let colors = ColorSettings::with_enabled(false);
        let line = render_line(&record(Level::Warn, &colors));
        assert_eq!(line.channel, Channel::Warn);
        assert_eq!(line.format, "[WARN] [cart] item added");
        assert!(line.styles.is_empty());
    }

    #[test]
    fn channels_follow_levels() {
        assert_eq!(Channel::for_level(Level::Debug), Channel::Debug);
        assert_eq!(Channel::for_level(Level::Error), Channel::Error);
    }

    #[test]
    fn persist_writes_both_keys() {
        let mut sink = sink();
        let mut config = Configuration::defaults_for(&Environment::from_parts(true, false, true));
        config.enabled = false;
        config.level = Level::Warn;

        sink.persist(&config).unwrap();

        let storage = sink.storage();
        assert_eq!(storage.peek("dualog_enabled"), Some("false"));
        let saved: Configuration =
            serde_json::from_str(storage.peek("dualog_config").unwrap()).unwrap();
        assert_eq!(saved, config);
    }

    #[test]
    fn restore_reads_what_persist_wrote() {
        let mut sink = sink();
        let mut config = Configuration::defaults_for(&Environment::from_parts(true, false, true));
        config.level = Level::Error;
        sink.persist(&config).unwrap();

        let state = sink.restore(&config.persistence).unwrap();
        assert_eq!(state.enabled, Some(true));
        assert_eq!(state.config.and_then(|c| c.level), Some(Level::Error));
    }

    #[test]
    fn restore_ignores_malformed_json() {
        let storage = MemoryStorage::with_entries([
            ("dualog_config", "{not json"),
            ("dualog_enabled", "false"),
        ]);
        let mut sink = StyledSink::new(RecordingConsole::new(), storage);

        let state = sink.restore(&PersistenceSettings::default()).unwrap();
        assert_eq!(state.config, None);
        assert_eq!(state.enabled, Some(false));
    }

    #[test]
    fn restore_without_saved_state_is_none() {
        let mut sink = sink();
        assert_eq!(sink.restore(&PersistenceSettings::default()), None);
    }

    #[test]
    fn stack_is_escaped_and_sent_to_level_channel() {
        let mut sink = sink();
        sink.write_stack(Level::Error, "at 100% load").unwrap();
        let lines = sink.console_mut().take();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].channel, Channel::Error);
        assert_eq!(lines[0].format, "at 100%% load");
    }

    #[test]
    fn control_surface_records_namespace_and_handler() {
        let mut sink = sink();
        assert_eq!(sink.control_namespace(), None);
        assert!(sink.control_handler().is_none());

        let handler: ControlHandler = std::sync::Arc::new(|input: &str| input.to_uppercase());
        sink.expose_control_surface(&ControlSurfaceSettings::default(), &handler)
            .unwrap();
        assert_eq!(sink.control_namespace(), Some("dualog"));
        assert_eq!(sink.control_handler().map(|handler| handler("help")).as_deref(), Some("HELP"));
    }

    #[test]
    fn writer_console_prints_plain_text() {
        let mut console = WriterConsole::new(Vec::new());
        console
            .emit(&StyledLine {
                channel: Channel::Info,
                format: "%c[INFO] hi".to_owned(),
                styles: vec!["color: red".to_owned()],
                args: vec!["3".to_owned()],
            })
            .unwrap();
        assert_eq!(console.into_inner(), b"[INFO] hi 3\n");
    }
}
