//! File logging bootstrap.
//!
//! Logs go to rotating files under `<data_dir>/logs/` so they never interfere
//! with CLI output or the terminal UI. Events are metadata-only
//! (`event=... id=...`); task titles and habit names are not logged.
//!
//! Initialization happens at most once per process and never panics. Writes
//! are unbuffered because most runs are short CLI invocations.

use std::path::{Path, PathBuf};

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;

const LOG_FILE_BASENAME: &str = "tracker";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

pub const DEFAULT_LOG_LEVEL: &str = "info";

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

/// Accepted level names, lowercased.
pub fn normalize_level(level: &str) -> Result<&'static str, String> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(format!("unsupported log level `{other}`")),
    }
}

/// Start file logging in `log_dir` at `level`.
///
/// Repeated calls with the same directory are no-ops; a different directory
/// is rejected.
pub fn init_logging(level: &str, log_dir: &Path) -> Result<(), String> {
    let level = normalize_level(level)?;

    if let Some(state) = ACTIVE_LOGGER.get() {
        if state.log_dir == log_dir {
            return Ok(());
        }
        return Err(format!(
            "logging already initialized at `{}`",
            state.log_dir.display()
        ));
    }

    ACTIVE_LOGGER
        .get_or_try_init(|| -> Result<ActiveLogger, String> {
            std::fs::create_dir_all(log_dir).map_err(|err| {
                format!("failed to create log directory `{}`: {err}", log_dir.display())
            })?;

            let handle = Logger::try_with_str(level)
                .map_err(|err| format!("invalid log level `{level}`: {err}"))?
                .log_to_file(
                    FileSpec::default()
                        .directory(log_dir)
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::Direct)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .start()
                .map_err(|err| format!("failed to start logger: {err}"))?;

            info!(
                "event=app_start platform={} version={}",
                std::env::consts::OS,
                env!("CARGO_PKG_VERSION")
            );

            Ok(ActiveLogger {
                log_dir: log_dir.to_path_buf(),
                _handle: handle,
            })
        })
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::normalize_level;

    #[test]
    fn level_names_are_normalized() {
        assert_eq!(normalize_level(" INFO "), Ok("info"));
        assert_eq!(normalize_level("warning"), Ok("warn"));
        assert!(normalize_level("loud").is_err());
    }
}
