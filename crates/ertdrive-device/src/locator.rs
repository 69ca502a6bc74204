//! Removable device selection.

use crate::error::{DeviceError, Result};
use crate::volume_table::{SystemVolumeTable, VolumeTable, REMOVABLE_TAG};
use ertdrive_core::MountPoint;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Device name fragment that marks flash media regardless of mount options.
const FLASH_HINT: &str = "flash";

/// Returns true if the mount is tagged removable or its device name looks
/// like flash media. Both checks ignore case.
#[must_use]
pub fn is_removable(mount: &MountPoint) -> bool {
    mount.has_option(REMOVABLE_TAG) || mount.device.to_lowercase().contains(FLASH_HINT)
}

/// One row of the drive listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveSummary {
    pub path: PathBuf,
    pub device: String,
    pub file_system: String,
    pub removable: bool,
}

impl From<MountPoint> for DriveSummary {
    fn from(mount: MountPoint) -> Self {
        let removable = is_removable(&mount);
        Self {
            path: mount.path,
            device: mount.device,
            file_system: mount.file_system,
            removable,
        }
    }
}

/// Finds the first removable volume in the OS volume table.
///
/// Cheap to clone; clones share the same table.
#[derive(Clone)]
pub struct DeviceLocator {
    table: Arc<dyn VolumeTable>,
}

impl DeviceLocator {
    /// Locator backed by an arbitrary volume table.
    pub fn new(table: impl VolumeTable + 'static) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    /// Locator backed by the live OS volume table.
    #[must_use]
    pub fn system() -> Self {
        Self::new(SystemVolumeTable::new())
    }

    /// First removable volume in enumeration order, if any.
    ///
    /// # Errors
    /// Returns [`DeviceError::Enumeration`] if the volume table cannot be read.
    /// An empty or non-removable table is `Ok(None)`.
    pub fn locate(&self) -> Result<Option<MountPoint>> {
        let found = self.table.volumes()?.into_iter().find(is_removable);
        match &found {
            Some(mount) => debug!(
                "Removable volume {} at {}",
                mount.device,
                mount.path.display()
            ),
            None => debug!("No removable volume mounted"),
        }
        Ok(found)
    }

    /// All enumerated volumes with their removable classification.
    pub fn list(&self) -> Result<Vec<DriveSummary>> {
        Ok(self
            .table
            .volumes()?
            .into_iter()
            .map(DriveSummary::from)
            .collect())
    }

    /// [`locate`](Self::locate) on the blocking thread pool.
    ///
    /// Volume enumeration can stall on unresponsive mounts, so async callers
    /// go through here.
    pub async fn locate_async(&self) -> Result<Option<MountPoint>> {
        let locator = self.clone();
        tokio::task::spawn_blocking(move || locator.locate())
            .await
            .map_err(|e| DeviceError::Task(e.to_string()))?
    }

    /// [`list`](Self::list) on the blocking thread pool.
    pub async fn list_async(&self) -> Result<Vec<DriveSummary>> {
        let locator = self.clone();
        tokio::task::spawn_blocking(move || locator.list())
            .await
            .map_err(|e| DeviceError::Task(e.to_string()))?
    }
}

impl std::fmt::Debug for DeviceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceLocator").finish_non_exhaustive()
    }
}
