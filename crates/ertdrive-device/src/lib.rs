//! ertdrive Device Module
//!
//! Enumerates mounted volumes and picks the first one that is removable
//! media (tagged `removable` by the OS, or a device name containing `flash`).

pub mod error;
pub mod locator;
pub mod mount_table;
pub mod volume_table;

// Re-export main types
pub use error::{DeviceError, Result};
pub use locator::{is_removable, DeviceLocator, DriveSummary};
pub use volume_table::{StaticVolumeTable, SystemVolumeTable, VolumeTable, REMOVABLE_TAG};
