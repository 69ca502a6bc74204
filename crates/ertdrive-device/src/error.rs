//! Error types for volume enumeration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while enumerating mounted volumes.
///
/// These are hard failures of the OS volume table, never "no device found".
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The volume table could not be read.
    #[error("failed to read volume table {}: {source}", path.display())]
    Enumeration {
        /// Table that failed to load
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// The blocking enumeration task panicked or was cancelled.
    #[error("volume enumeration task failed: {0}")]
    Task(String),
}

/// Result type for device operations.
pub type Result<T> = std::result::Result<T, DeviceError>;
