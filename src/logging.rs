// File: ./src/logging.rs
//! File logging. The terminal belongs to the UI, so nothing is written to
//! stderr while it runs.
use anyhow::{Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use std::path::Path;

const LOG_FILE_BASENAME: &str = "tickbox";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

/// Starts the file logger. `RUST_LOG` wins over `level` when set.
/// Keep the returned handle alive for as long as logs should be written.
pub fn init(level: &str, log_dir: &Path) -> Result<LoggerHandle> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Could not create log dir {}", log_dir.display()))?;

    Logger::try_with_env_or_str(level)
        .context("Invalid log level")?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_FILE_BASENAME)
                .suppress_timestamp(),
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
        .context("Could not start logger")
}
