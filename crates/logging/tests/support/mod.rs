//! Shared helpers for the integration tests.
//!
//! Loggers built here write to in-memory buffers, read time from a
//! [`ManualClock`], and classify the runtime from fixed values, so every test
//! owns an isolated, deterministic instance.

#![allow(dead_code)]

use std::env;
use std::ffi::OsString;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use dualog::sink::{AnsiSink, OutputSink, Record, SinkError, Storage};
use dualog::{
    ColorSettings, Configuration, Environment, Level, Logger, ManualClock, PartialConfig,
    StaticRuntime,
};
use time::OffsetDateTime;

/// Sink capturing stdout-bound and stderr-bound lines separately.
pub type Captured = AnsiSink<Vec<u8>, Vec<u8>>;

pub const SERVER_DEV: Environment = Environment::from_parts(false, true, true);
pub const SERVER_PROD: Environment = Environment::from_parts(false, true, false);
pub const BROWSER_DEV: Environment = Environment::from_parts(true, false, true);

/// Caller configuration that strips timestamps and colors from the output.
pub fn plain() -> PartialConfig {
    PartialConfig::new()
        .show_timestamp(false)
        .colors(ColorSettings::with_enabled(false))
}

/// Development server logger writing plain lines to memory.
pub fn server_logger() -> (Logger<Captured>, Arc<ManualClock>) {
    server_logger_with(plain())
}

/// Development server logger with the given caller configuration.
pub fn server_logger_with(config: PartialConfig) -> (Logger<Captured>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH));
    let logger = Logger::builder()
        .environment(SERVER_DEV)
        .runtime(StaticRuntime::server())
        .config(config)
        .clock(clock.clone())
        .build(AnsiSink::new(Vec::new(), Vec::new()));
    (logger, clock)
}

/// Lines written so far, as (stdout, stderr).
pub fn lines(logger: &Logger<Captured>) -> (Vec<String>, Vec<String>) {
    let split = |bytes: &[u8]| {
        String::from_utf8_lossy(bytes)
            .lines()
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };
    (split(logger.sink().out()), split(logger.sink().err()))
}

/// Every line written so far, stdout first.
pub fn all_lines(logger: &Logger<Captured>) -> Vec<String> {
    let (mut out, err) = lines(logger);
    out.extend(err);
    out
}

/// Sink whose every operation fails, counting the attempts.
#[derive(Debug, Default)]
pub struct FailingSink {
    pub writes: usize,
    pub stacks: usize,
    pub persists: usize,
}

impl OutputSink for FailingSink {
    fn write(&mut self, _record: &Record<'_>) -> Result<(), SinkError> {
        self.writes += 1;
        Err(SinkError::Unavailable("console"))
    }

    fn write_stack(&mut self, _level: Level, _stack: &str) -> Result<(), SinkError> {
        self.stacks += 1;
        Err(io::Error::other("stream closed").into())
    }

    fn persist(&mut self, _config: &Configuration) -> Result<(), SinkError> {
        self.persists += 1;
        Err(SinkError::Storage("quota exceeded".to_owned()))
    }
}

/// Store rejecting every read and write.
#[derive(Debug, Default)]
pub struct FailingStorage;

impl Storage for FailingStorage {
    fn get(&self, _key: &str) -> Result<Option<String>, SinkError> {
        Err(SinkError::Storage("access denied".to_owned()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), SinkError> {
        Err(SinkError::Storage("access denied".to_owned()))
    }
}

/// In-memory target for `tracing` output.
#[derive(Clone, Debug, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a thread-local subscriber and returns its result together
/// with every diagnostic the crate emitted meanwhile.
pub fn capture_diagnostics<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let value = tracing::subscriber::with_default(subscriber, f);
    (value, logs.contents())
}

/// Global mutex guarding process environment mutations.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Scoped environment change restored on drop.
#[derive(Debug)]
pub struct EnvGuard {
    key: OsString,
    previous: Option<OsString>,
}

impl EnvGuard {
    /// Sets `key` to `value` for the duration of the guard.
    #[allow(unsafe_code)]
    pub fn set(key: &'static str, value: &str) -> Self {
        let key = OsString::from(key);
        let previous = env::var_os(&key);
        // SAFETY: callers hold ENV_LOCK, so no other test thread touches the
        // environment concurrently.
        unsafe {
            env::set_var(&key, value);
        }
        Self { key, previous }
    }
}

#[allow(unsafe_code)]
impl Drop for EnvGuard {
    fn drop(&mut self) {
        // SAFETY: see `EnvGuard::set`.
        unsafe {
            match &self.previous {
                Some(value) => env::set_var(&self.key, value),
                None => env::remove_var(&self.key),
            }
        }
    }
}
