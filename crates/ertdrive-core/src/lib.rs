//! ertdrive Core - Foundation crate for the ertdrive wallet-drive agent.
//!
//! This crate provides shared types, error handling and configuration
//! management that all other ertdrive crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with platform paths
//! - [`types`] - Shared data types (`MountPoint`, `WalletRecord`)
//!
//! # Example
//!
//! ```rust
//! use ertdrive_core::{AppConfig, MountPoint};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.server.port, 5005);
//!
//! let mount = MountPoint::new("/media/usb", "/dev/sdb1", "vfat").with_options(["removable"]);
//! assert!(mount.has_option("removable"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, ScanConfig, ServerConfig, WatchConfig};
pub use error::{ConfigError, ConfigResult, ErtdriveError, Result};
pub use types::{MountPoint, WalletRecord};
