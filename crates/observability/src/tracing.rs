//! Tracing/logging initialization.
//!
//! Events are rendered one per line as
//!
//! ```text
//! 2024-03-09 14:05:07,123 - WARNING - File inventory.json not found. Starting with empty inventory.
//! ```
//!
//! and appended to a log file. The filter defaults to `info` and can be
//! overridden through `RUST_LOG`.

use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use ::tracing::{Event, Level, Subscriber};
use chrono::Local;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

use crate::ObservabilityError;

/// Log file used when the caller does not name one.
pub const DEFAULT_LOG_PATH: &str = "inventory.log";

const DEFAULT_FILTER: &str = "info";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Where operational logs go and what passes the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub path: PathBuf,
    /// Filter directive used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_PATH)
    }
}

impl LogConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }

    pub fn with_filter(mut self, directive: impl Into<String>) -> Self {
        self.default_filter = directive.into();
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_filter))
    }
}

/// `<timestamp> - <LEVEL> - <message>` event format.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogLineFormat;

impl<S, N> FormatEvent<S, N> for LogLineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format(TIMESTAMP_FORMAT),
            level_name(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    if *level == Level::WARN {
        "WARNING"
    } else {
        level.as_str()
    }
}

/// Build a subscriber that renders [`LogLineFormat`] lines into `make_writer`.
pub fn subscriber<W>(filter: EnvFilter, make_writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(make_writer)
        .event_format(LogLineFormat)
        .finish()
}

/// Initialize tracing/logging for the process, appending to `config.path`.
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init(config: &LogConfig) -> Result<(), ObservabilityError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.path)
        .map_err(|source| ObservabilityError::OpenLogFile {
            path: config.path.clone(),
            source,
        })?;

    let _ = ::tracing::subscriber::set_global_default(subscriber(config.env_filter(), Mutex::new(file)));
    Ok(())
}

/// Shared in-memory log sink, for embedding callers and tests that need to
/// inspect what was logged.
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        // A writer that panicked mid-event still left its bytes behind.
        let buf = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buf).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }
}

pub struct LogBufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| io::Error::other("log buffer lock poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogBufferWriter {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn capture(filter: &str, f: impl FnOnce()) -> Vec<String> {
        let buf = LogBuffer::new();
        ::tracing::subscriber::with_default(subscriber(EnvFilter::new(filter), buf.clone()), f);
        buf.lines()
    }

    fn split(line: &str) -> (&str, &str, &str) {
        let mut parts = line.splitn(3, " - ");
        (
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
            parts.next().unwrap_or_default(),
        )
    }

    #[test]
    fn renders_timestamp_level_message() {
        let lines = capture("info", || ::tracing::info!("Added {} of {}", 10, "apple"));
        assert_eq!(lines.len(), 1);

        let (ts, level, message) = split(&lines[0]);
        assert_eq!(level, "INFO");
        assert_eq!(message, "Added 10 of apple");
        // YYYY-MM-DD HH:MM:SS,mmm
        assert_eq!(ts.len(), 23, "{ts}");
        assert_eq!(&ts[10..11], " ");
        assert_eq!(&ts[19..20], ",");
    }

    #[test]
    fn warn_is_spelled_out() {
        let lines = capture("info", || {
            ::tracing::warn!("File x.json not found. Starting with empty inventory.");
            ::tracing::error!("Attempted to remove non-existent item: orange");
        });
        assert_eq!(split(&lines[0]).1, "WARNING");
        assert_eq!(split(&lines[1]).1, "ERROR");
    }

    #[test]
    fn filter_drops_debug_by_default() {
        let lines = capture(DEFAULT_FILTER, || {
            ::tracing::debug!("hidden");
            ::tracing::info!("shown");
        });
        assert_eq!(lines.len(), 1);
        assert_eq!(split(&lines[0]).2, "shown");
    }

    #[test]
    fn buffer_survives_poisoned_lock() {
        use std::io::Write;

        let buf = LogBuffer::new();
        buf.make_writer().write_all(b"kept line\n").unwrap();

        let inner = Arc::clone(&buf.inner);
        let poisoner = std::thread::spawn(move || {
            let _guard = inner.lock().unwrap();
            panic!("writer panicked while holding the buffer");
        });
        assert!(poisoner.join().is_err());
        assert!(buf.inner.is_poisoned());

        assert_eq!(buf.lines(), vec!["kept line".to_string()]);
    }

    #[test]
    fn config_defaults() {
        let config = LogConfig::default();
        assert_eq!(config.path, PathBuf::from("inventory.log"));
        assert_eq!(config.default_filter, "info");
        assert_eq!(LogConfig::new("x.log").with_filter("debug").default_filter, "debug");
    }

    #[test]
    fn init_reports_unopenable_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig::new(dir.path().join("missing").join("inventory.log"));
        let err = init(&config).unwrap_err();
        assert!(matches!(err, ObservabilityError::OpenLogFile { .. }));
    }

    #[test]
    fn init_creates_log_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig::new(dir.path().join("inventory.log"));
        init(&config).unwrap();
        init(&config).unwrap();
        assert!(config.path.exists());
    }
}
