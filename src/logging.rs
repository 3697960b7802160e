//! Logging setup.
//!
//! Library code only emits `tracing` events. A [`Logger`] decides where they
//! go: it is built once from a [`LogConfig`] and installed for the duration
//! of a call with [`Logger::scope`], so nothing in the crate depends on a
//! process-wide subscriber.

use crate::file_organizer::LOG_FILE_NAME;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::fmt::Result as FmtResult;
use std::sync::Mutex;
use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Event, Level, Subscriber, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{self, FmtContext, FormatEvent, FormatFields, time::ChronoLocal};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

/// Where log output goes and how much of it.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Most verbose level that is recorded. `RUST_LOG` can refine it.
    pub level: Level,
    /// Write events to stdout.
    pub console: bool,
    /// Append events to this file.
    pub log_file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            console: true,
            log_file: Some(PathBuf::from(LOG_FILE_NAME)),
        }
    }
}

/// Console line format: `LEVEL: message`, no colors.
struct LevelPrefix;

impl<S, N> FormatEvent<S, N> for LevelPrefix
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> FmtResult {
        write!(writer, "{}: ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// An explicit logging destination for a run.
pub struct Logger {
    dispatch: Dispatch,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Builds the subscriber described by `config`.
    ///
    /// If the log file cannot be opened the logger falls back to the console
    /// only and records a warning.
    pub fn new(config: &LogConfig) -> Self {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(config.level).into())
            .from_env_lossy();

        let console_layer = config.console.then(|| {
            fmt::layer()
                .with_ansi(false)
                .event_format(LevelPrefix)
                .with_writer(io::stdout)
        });

        let (file_layer, file_error) = match &config.log_file {
            Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => {
                    let layer = fmt::layer()
                        .with_ansi(false)
                        .with_target(false)
                        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
                        .with_writer(Mutex::new(file));
                    (Some(layer), None)
                }
                Err(e) => (None, Some((path.clone(), e))),
            },
            None => (None, None),
        };

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer);

        let logger = Self {
            dispatch: Dispatch::new(subscriber),
            log_file: match file_error {
                Some(_) => None,
                None => config.log_file.clone(),
            },
        };

        if let Some((path, e)) = file_error {
            logger.scope(|| warn!("Could not set up log file {}: {}", path.display(), e));
        }

        logger
    }

    /// Runs `f` with this logger receiving every event emitted on this thread.
    pub fn scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// The log file actually being written, if any.
    pub fn log_file(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tracing::{debug, info};

    fn file_only(level: Level, path: PathBuf) -> LogConfig {
        LogConfig {
            level,
            console: false,
            log_file: Some(path),
        }
    }

    #[test]
    fn test_events_reach_log_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("run.log");
        let logger = Logger::new(&file_only(Level::INFO, path.clone()));

        logger.scope(|| info!("Moved: 'a.txt' to 'Documents/a.txt'"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Moved: 'a.txt' to 'Documents/a.txt'"));
        assert!(content.contains("INFO"));
        assert_eq!(logger.log_file(), Some(path.as_path()));
    }

    #[test]
    fn test_level_filters_debug_events() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("run.log");
        let logger = Logger::new(&file_only(Level::INFO, path.clone()));

        logger.scope(|| {
            debug!("hidden detail");
            info!("visible line");
        });

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("visible line"));
        assert!(!content.contains("hidden detail"));
    }

    #[test]
    fn test_verbose_level_keeps_debug_events() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("run.log");
        let logger = Logger::new(&file_only(Level::DEBUG, path.clone()));

        logger.scope(|| debug!("Skipping directory: archive"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Skipping directory: archive"));
    }

    #[test]
    fn test_console_format_is_level_then_message() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("console.log");
        let file = std::fs::File::create(&path).unwrap();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_ansi(false)
                .event_format(LevelPrefix)
                .with_writer(Mutex::new(file)),
        );

        tracing::subscriber::with_default(subscriber, || {
            info!("dirsort started");
            warn!("Could not read an entry");
        });

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "INFO: dirsort started\nWARN: Could not read an entry\n");
    }

    #[test]
    fn test_unwritable_log_file_falls_back() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("missing").join("run.log");
        let logger = Logger::new(&file_only(Level::INFO, path));

        assert_eq!(logger.log_file(), None);
        logger.scope(|| info!("still fine"));
    }

    #[test]
    fn test_events_outside_scope_are_not_captured() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("run.log");
        let logger = Logger::new(&file_only(Level::INFO, path.clone()));

        info!("before scope");
        logger.scope(|| info!("inside scope"));

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("inside scope"));
        assert!(!content.contains("before scope"));
    }
}
