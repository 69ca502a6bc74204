//! Sources of the mounted-volume list.
//!
//! [`VolumeTable`] is the seam between the locator and the OS: the agent
//! uses [`SystemVolumeTable`], tests and embedders can supply
//! [`StaticVolumeTable`].

use crate::error::Result;
use ertdrive_core::MountPoint;
use std::collections::HashSet;
use std::path::PathBuf;
use sysinfo::Disks;
use tracing::debug;

/// Tag added to mounts the OS reports as removable media.
pub const REMOVABLE_TAG: &str = "removable";

/// Something that can list the currently mounted, non-pseudo volumes.
///
/// Implementations must return volumes in the order the OS reports them and
/// must not cache between calls.
pub trait VolumeTable: Send + Sync {
    /// Enumerate mounted volumes.
    fn volumes(&self) -> Result<Vec<MountPoint>>;
}

/// Live OS volume table.
///
/// On Linux the kernel mount table supplies paths, devices and mount
/// options, and `sysinfo` supplies the removable flag. Elsewhere `sysinfo`
/// is the only source.
#[derive(Debug, Clone)]
pub struct SystemVolumeTable {
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    mounts_path: PathBuf,
    #[cfg_attr(not(target_os = "linux"), allow(dead_code))]
    filesystems_path: PathBuf,
}

impl SystemVolumeTable {
    /// Read the live tables.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mounts_path: PathBuf::from("/proc/self/mounts"),
            filesystems_path: PathBuf::from("/proc/filesystems"),
        }
    }

    /// Read the mount and file system tables from other paths.
    ///
    /// Only meaningful on Linux.
    #[must_use]
    pub fn with_paths(mounts_path: impl Into<PathBuf>, filesystems_path: impl Into<PathBuf>) -> Self {
        Self {
            mounts_path: mounts_path.into(),
            filesystems_path: filesystems_path.into(),
        }
    }
}

impl Default for SystemVolumeTable {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeTable for SystemVolumeTable {
    #[cfg(target_os = "linux")]
    fn volumes(&self) -> Result<Vec<MountPoint>> {
        use crate::error::DeviceError;
        use crate::mount_table::{filter_physical, parse_mount_table, parse_physical_filesystems};

        let read = |path: &PathBuf| {
            std::fs::read_to_string(path).map_err(|source| DeviceError::Enumeration {
                path: path.clone(),
                source,
            })
        };

        let physical = parse_physical_filesystems(&read(&self.filesystems_path)?);
        let mounts = filter_physical(parse_mount_table(&read(&self.mounts_path)?), &physical);
        let removable = removable_mount_points();

        Ok(mounts
            .into_iter()
            .map(|mut mount| {
                if removable.contains(&mount.path) && !mount.has_option(REMOVABLE_TAG) {
                    mount.options.push(REMOVABLE_TAG.to_string());
                }
                mount
            })
            .collect())
    }

    #[cfg(not(target_os = "linux"))]
    fn volumes(&self) -> Result<Vec<MountPoint>> {
        let disks = Disks::new_with_refreshed_list();
        Ok(disks
            .list()
            .iter()
            .map(|disk| {
                let file_system = disk.file_system().to_string_lossy().into_owned();
                let mut options = vec![file_system.clone()];
                if disk.is_removable() {
                    options.push(REMOVABLE_TAG.to_string());
                }
                MountPoint::new(
                    disk.mount_point(),
                    disk.name().to_string_lossy().into_owned(),
                    file_system,
                )
                .with_options(options)
            })
            .collect())
    }
}

/// Mount points `sysinfo` flags as removable media.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn removable_mount_points() -> HashSet<PathBuf> {
    let disks = Disks::new_with_refreshed_list();
    let removable: HashSet<PathBuf> = disks
        .list()
        .iter()
        .filter(|disk| disk.is_removable())
        .map(|disk| disk.mount_point().to_path_buf())
        .collect();
    debug!("sysinfo reports {} removable mount(s)", removable.len());
    removable
}

/// Fixed volume list.
#[derive(Debug, Clone, Default)]
pub struct StaticVolumeTable {
    volumes: Vec<MountPoint>,
}

impl StaticVolumeTable {
    /// Serve `volumes` on every call, in the given order.
    #[must_use]
    pub fn new(volumes: Vec<MountPoint>) -> Self {
        Self { volumes }
    }
}

impl VolumeTable for StaticVolumeTable {
    fn volumes(&self) -> Result<Vec<MountPoint>> {
        Ok(self.volumes.clone())
    }
}
