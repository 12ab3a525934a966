use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{info, warn};

const LOG_FILE_BASENAME: &str = "homeroom";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;
const FALLBACK_LEVEL: &str = "warn";

/// Starts file logging under `<data_dir>/logs`, or warnings on stderr when
/// that directory cannot be used. Keep the handle alive for the whole run.
pub fn init(level: &str, data_dir: &Path) -> Result<LoggerHandle> {
    // Reject a bad level before touching the filesystem.
    Logger::try_with_str(level).map_err(|err| anyhow!("invalid log level `{level}`: {err}"))?;

    match start_file_logger(level, data_dir) {
        Ok((handle, log_dir)) => {
            info!(
                "event=app_start version={} log_dir={}",
                env!("CARGO_PKG_VERSION"),
                log_dir.display()
            );
            Ok(handle)
        },
        Err(err) => {
            let handle = Logger::try_with_str(FALLBACK_LEVEL)
                .map_err(|e| anyhow!("invalid log level `{FALLBACK_LEVEL}`: {e}"))?
                .log_to_stderr()
                .start()
                .map_err(|e| anyhow!("failed to start logger: {e}"))?;
            warn!("event=app_start log_target=stderr reason=\"{:#}\"", err);
            Ok(handle)
        },
    }
}

fn start_file_logger(level: &str, data_dir: &Path) -> Result<(LoggerHandle, PathBuf)> {
    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let handle = Logger::try_with_str(level)
        .map_err(|err| anyhow!("invalid log level `{level}`: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| anyhow!("failed to start logger: {err}"))?;
    Ok((handle, log_dir))
}
