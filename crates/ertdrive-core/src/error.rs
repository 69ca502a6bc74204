//! Core error types for ertdrive.
//!
//! Subsystem crates define their own error enums; this module holds the
//! central error used at the application boundary and the configuration
//! errors shared by every crate that reads `AppConfig`.

use thiserror::Error;

/// Central error type for ertdrive operations.
#[derive(Error, Debug)]
pub enum ErtdriveError {
    /// Configuration errors (file loading, parsing, validation)
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors (listener bind, signal handling)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (platform base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `ErtdriveError`.
pub type Result<T> = std::result::Result<T, ErtdriveError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ErtdriveError::Internal("watcher task panicked".to_string());
        assert_eq!(err.to_string(), "internal error: watcher task panicked");

        let err = ConfigError::InvalidValue {
            field: "server.port".to_string(),
            reason: "must be non-zero".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value for server.port: must be non-zero"
        );
    }

    #[test]
    fn test_error_from_config() {
        let config_err = ConfigError::NoConfigDir;
        let err: ErtdriveError = config_err.into();
        assert!(matches!(err, ErtdriveError::Config(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "test");
        let err: ErtdriveError = io_err.into();
        assert!(matches!(err, ErtdriveError::Io(_)));
    }

    #[test]
    fn test_central_error_variants() {
        // Device failures stay in `ertdrive_device::DeviceError`
        fn kind(err: &ErtdriveError) -> &'static str {
            match err {
                ErtdriveError::Config(_) => "config",
                ErtdriveError::Io(_) => "io",
                ErtdriveError::Internal(_) => "internal",
            }
        }
        assert_eq!(kind(&ConfigError::NoConfigDir.into()), "config");
        assert_eq!(kind(&ErtdriveError::Internal(String::new())), "internal");
    }
}
