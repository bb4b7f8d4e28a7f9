use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Overrides the directory log files are written to.
pub const LOG_DIR_ENV: &str = "BOOTKIT_LOG_DIR";

const DEFAULT_FILTER: &str = "info";

/// Directory for `{component}.log.{date}` files: `$BOOTKIT_LOG_DIR`, else
/// `~/.bootkit/logs`.
pub fn log_dir() -> PathBuf {
    resolve_log_dir(std::env::var_os(LOG_DIR_ENV).map(PathBuf::from), dirs::home_dir())
}

fn resolve_log_dir(configured: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    configured
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| home.unwrap_or_else(|| PathBuf::from(".")).join(".bootkit/logs"))
}

/// Install the global subscriber: a daily file per component, plus stderr
/// when `to_stderr` is set. `RUST_LOG` overrides the `info` default.
///
/// Keep the returned guard alive; dropping it flushes and stops the file
/// writer.
pub fn init_logging(component: &str, to_stderr: bool) -> WorkerGuard {
    let dir = log_dir();
    if let Err(e) = std::fs::create_dir_all(&dir) {
        eprintln!("Cannot create log directory {}: {}", dir.display(), e);
    }

    let (file_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&dir, component));
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);
    let stderr_layer = to_stderr.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    guard
}
