// Logging module - Logging infrastructure
use crate::domain::config::LoggingConfig;
use crate::domain::error::{ModemError, ModemResult};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};

const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Log destinations owned by the entry point and handed to each connection.
///
/// Nothing is installed process-wide: events are routed to this context only
/// while code runs inside [`LogContext::in_scope`].
#[derive(Clone)]
pub struct LogContext {
    dispatch: Dispatch,
}

impl LogContext {
    /// Build console and file layers from the logging configuration
    pub fn new(config: &LoggingConfig, verbose: bool) -> ModemResult<Self> {
        let level = if verbose { "debug" } else { config.level.as_str() };
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("smsmodem={}", level)));

        let console = config.console.then(|| {
            tracing_subscriber::fmt::layer()
                .with_writer(io::stdout)
                .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
                .with_target(true)
        });

        let path = match &config.file {
            Some(path) => path.clone(),
            None => default_log_path()?,
        };
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| ModemError::Config {
                message: format!("Failed to open log file {}: {}", path.display(), e),
            })?;
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
            .with_target(true);

        let subscriber = tracing_subscriber::registry()
            .with(env_filter)
            .with(console)
            .with(file_layer);

        Ok(Self {
            dispatch: Dispatch::new(subscriber),
        })
    }

    /// Route INFO and above to an arbitrary writer, without timestamps
    pub fn with_writer<W>(writer: W) -> Self
    where
        W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    {
        let subscriber = tracing_subscriber::registry().with(LevelFilter::INFO).with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .without_time()
                .with_target(true),
        );

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Drop every event
    pub fn disabled() -> Self {
        Self {
            dispatch: Dispatch::none(),
        }
    }

    /// Run `f` with this context as the active subscriber
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}

impl std::fmt::Debug for LogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogContext").finish_non_exhaustive()
    }
}

/// `<cwd>/smsmodem.log`
pub fn default_log_path() -> ModemResult<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| ModemError::Config {
        message: format!("Failed to get current directory: {}", e),
    })?;
    Ok(cwd.join(format!("{}.log", env!("CARGO_PKG_NAME"))))
}

/// In-memory log sink
#[derive(Clone, Default)]
pub struct CaptureWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Captured events, one per line
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self.buffer.lock().unwrap_or_else(|e| e.into_inner());
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CaptureWriter {
    type Writer = CaptureWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
