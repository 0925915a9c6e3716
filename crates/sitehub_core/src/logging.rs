use crate::error::AppError;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "sitehub";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    log_dir: PathBuf,
    _logger: LoggerHandle,
}

/// File logging is opt-in and initialized at most once per process.
/// A second call with the same directory is a no-op; a different
/// directory is rejected.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), AppError> {
    let trimmed = log_dir.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input("log directory cannot be empty"));
    }
    let dir = PathBuf::from(trimmed);

    if let Some(state) = LOGGING_STATE.get() {
        if state.log_dir == dir {
            return Ok(());
        }
        return Err(AppError::invalid_input(format!(
            "logging already writes to {}",
            state.log_dir.display()
        )));
    }

    let init_dir = dir.clone();
    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState, AppError> {
        std::fs::create_dir_all(&init_dir).map_err(|err| AppError::io(err.to_string()))?;

        let logger = Logger::try_with_str(level)
            .map_err(|err| AppError::invalid_input(format!("invalid log level: {err}")))?
            .log_to_file(
                FileSpec::default()
                    .directory(init_dir.as_path())
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .start()
            .map_err(|err| AppError::io(format!("failed to start logger: {err}")))?;

        info!(
            "logging started, version={} dir={}",
            env!("CARGO_PKG_VERSION"),
            init_dir.display()
        );

        Ok(LoggingState {
            log_dir: init_dir,
            _logger: logger,
        })
    })?;

    if state.log_dir != dir {
        return Err(AppError::invalid_input(format!(
            "logging already writes to {}",
            state.log_dir.display()
        )));
    }

    Ok(())
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}
