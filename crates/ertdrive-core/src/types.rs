//! Shared types used across ertdrive.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use zeroize::Zeroizing;

/// A mounted volume as reported by the OS volume table.
///
/// Mount points are re-enumerated on every call and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MountPoint {
    /// Where the volume is mounted
    pub path: PathBuf,
    /// Device identifier (e.g. `/dev/sdb1`, `E:\`)
    pub device: String,
    /// File system type as reported by the OS
    pub file_system: String,
    /// Mount option tags (e.g. `rw`, `nosuid`, `removable`)
    pub options: Vec<String>,
}

impl MountPoint {
    /// Create a mount point with no option tags.
    pub fn new(
        path: impl Into<PathBuf>,
        device: impl Into<String>,
        file_system: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            device: device.into(),
            file_system: file_system.into(),
            options: Vec::new(),
        }
    }

    /// Builder-style helper to attach option tags.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.extend(options.into_iter().map(Into::into));
        self
    }

    /// Case-insensitive check for an option tag.
    #[must_use]
    pub fn has_option(&self, tag: &str) -> bool {
        self.options.iter().any(|opt| opt.eq_ignore_ascii_case(tag))
    }
}

/// Trimmed text content of a discovered wallet file.
///
/// The content is opaque and never structured or validated. It is wiped
/// from memory on drop and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct WalletRecord {
    content: Zeroizing<String>,
    source: PathBuf,
    hidden: bool,
}

impl WalletRecord {
    /// Wrap already-trimmed content together with its provenance.
    pub fn new(content: String, source: impl Into<PathBuf>, hidden: bool) -> Self {
        Self {
            content: Zeroizing::new(content),
            source: source.into(),
            hidden,
        }
    }

    /// The wallet payload.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// File the payload was read from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Whether the host file system marks the source file as hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

impl fmt::Debug for WalletRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletRecord")
            .field("content", &format_args!("<{} bytes redacted>", self.content.len()))
            .field("source", &self.source)
            .field("hidden", &self.hidden)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_point_options() {
        let mount = MountPoint::new("/media/usb", "/dev/sdb1", "vfat")
            .with_options(["rw", "nosuid", "Removable"]);

        assert!(mount.has_option("removable"));
        assert!(mount.has_option("RW"));
        assert!(!mount.has_option("ro"));
    }

    #[test]
    fn test_mount_point_serializes_camel_case() {
        let mount = MountPoint::new("/media/usb", "/dev/sdb1", "vfat");
        let json = serde_json::to_value(&mount).expect("serialize mount point");
        assert_eq!(json["fileSystem"], "vfat");
        assert_eq!(json["device"], "/dev/sdb1");
    }

    #[test]
    fn test_wallet_record_accessors() {
        let record = WalletRecord::new("seed".to_string(), "/media/usb/.w.ert", true);
        assert_eq!(record.content(), "seed");
        assert_eq!(record.source(), Path::new("/media/usb/.w.ert"));
        assert!(record.is_hidden());
    }

    #[test]
    fn test_wallet_record_debug_redacts_content() {
        let record = WalletRecord::new("mySecretSeed".to_string(), "/w.ert", false);
        let debug = format!("{record:?}");
        assert!(!debug.contains("mySecretSeed"));
        assert!(debug.contains("12 bytes redacted"));
    }
}
