use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::model::LogConfig;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "OSB_LOG";

/// Where log lines go
#[derive(Debug, Clone)]
pub enum LogTarget {
    /// CLI commands log to stderr
    Stderr,
    /// The TUI owns the terminal, so it logs to a file
    File(PathBuf),
}

/// `<state dir>/openspec-board/osb.log`
pub fn default_log_file() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|d| d.join("openspec-board").join("osb.log"))
}

/// Filter from `OSB_LOG`, else the config level, else `default_level`.
pub fn build_filter(config: &LogConfig, default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return filter;
    }
    let level = config.level.as_deref().unwrap_or(default_level);
    EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// session when logging to a file; dropping it flushes the writer.
pub fn init_logging(config: &LogConfig, default_level: &str, target: LogTarget) -> Option<WorkerGuard> {
    let filter = build_filter(config, default_level);
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
        LogTarget::File(path) => {
            let dir = path.parent().unwrap_or(Path::new("."));
            if std::fs::create_dir_all(dir).is_err() {
                return None;
            }
            let file_name = path.file_name()?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(writer)
                .try_init();
            Some(guard)
        }
    }
}
