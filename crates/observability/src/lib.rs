//! Operational logging (shared setup).
//!
//! Ledger code logs through plain `tracing` macros; this crate decides where
//! those events go. By default they are appended to `inventory.log` as
//! `<timestamp> - <LEVEL> - <message>` lines.

use std::path::PathBuf;

use thiserror::Error;

/// Tracing configuration (filters, writers, line format).
pub mod tracing;

pub use crate::tracing::{LogBuffer, LogConfig, LogLineFormat, DEFAULT_LOG_PATH, subscriber};

#[derive(Debug, Error)]
pub enum ObservabilityError {
    #[error("failed to open log file {}: {source}", .path.display())]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Initialize process-wide logging to the default log file.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() -> Result<(), ObservabilityError> {
    crate::tracing::init(&LogConfig::default())
}

/// Initialize process-wide logging with an explicit configuration.
pub fn init_with(config: &LogConfig) -> Result<(), ObservabilityError> {
    crate::tracing::init(config)
}
