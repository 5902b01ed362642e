use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "puremvc=info";
const LOG_FILE: &str = "puremvc.log";

#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Used when `RUST_LOG` is unset or invalid.
    pub default_filter: String,
    pub stderr: bool,
    /// Daily rolling file output, off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_FILTER.to_string(),
            stderr: true,
            log_dir: None,
        }
    }
}

pub struct LoggingGuard {
    _guard: Option<WorkerGuard>,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

/// Install the global subscriber. Returns `None` if one is already set.
pub fn init(options: &LoggingOptions) -> Option<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_filter));

    let mut guard = None;
    let mut log_dir = None;
    let file_layer = match options.log_dir.as_deref() {
        Some(dir) => match std::fs::create_dir_all(dir) {
            Ok(()) => {
                let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE);
                let (non_blocking, worker) = tracing_appender::non_blocking(file_appender);
                guard = Some(worker);
                log_dir = Some(dir.to_path_buf());
                Some(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
            }
            Err(err) => {
                eprintln!("log dir {} unavailable: {err}", dir.display());
                None
            }
        },
        None => None,
    };

    let stderr_layer = options.stderr.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer);

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    match log_dir.as_deref() {
        Some(dir) => tracing::info!(log_dir = %dir.display(), "tracing initialized"),
        None => tracing::info!("tracing initialized"),
    }

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
