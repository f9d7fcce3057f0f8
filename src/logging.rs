use std::io;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_FILE_PREFIX: &str = "leaderboard.log";

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, or `debug` with
/// `verbose`. Plain commands log to stderr. The dashboard owns the terminal,
/// so with `to_file` logs go to a daily rolling file under the cache dir
/// instead. The returned guard must be held until exit to flush that file.
pub fn init_tracing(verbose: bool, to_file: bool) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if to_file {
        if let Some(dir) = log_dir() {
            if std::fs::create_dir_all(&dir).is_ok() {
                let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let init_result = tracing_subscriber::registry()
                    .with(filter)
                    .with(fmt::layer().with_ansi(false).with_writer(writer))
                    .try_init();
                return match init_result {
                    Ok(()) => Some(guard),
                    Err(err) => {
                        eprintln!("tracing init failed: {err}");
                        None
                    }
                };
            }
        }
        // No usable log dir: stay silent rather than draw over the dashboard
        return None;
    }

    if let Err(err) = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()
    {
        eprintln!("tracing init failed: {err}");
    }
    None
}

/// Directory for dashboard log files.
pub fn log_dir() -> Option<std::path::PathBuf> {
    dirs::cache_dir().map(|d| d.join("leaderboard").join("logs"))
}
