//! Parsers for the Linux kernel mount tables.
//!
//! `/proc/self/mounts` lists every mount including pseudo file systems;
//! `/proc/filesystems` tells which file system types need a backing device.

use ertdrive_core::MountPoint;
use std::collections::HashSet;

/// File system types backed by a real device, from `/proc/filesystems`.
///
/// Lines flagged `nodev` are pseudo file systems (proc, sysfs, tmpfs, ...).
#[must_use]
pub fn parse_physical_filesystems(contents: &str) -> HashSet<String> {
    let mut physical: HashSet<String> = contents
        .lines()
        .filter(|line| !line.starts_with("nodev"))
        .map(str::trim)
        .filter(|fs| !fs.is_empty())
        .map(str::to_string)
        .collect();
    // zfs is registered as nodev but mounts real pools
    physical.insert("zfs".to_string());
    physical
}

/// Parse the contents of `/proc/self/mounts`, preserving kernel order.
///
/// Malformed lines are skipped.
#[must_use]
pub fn parse_mount_table(contents: &str) -> Vec<MountPoint> {
    contents.lines().filter_map(parse_mount_line).collect()
}

fn parse_mount_line(line: &str) -> Option<MountPoint> {
    let mut fields = line.split_whitespace();
    let device = fields.next()?;
    let path = fields.next()?;
    let fstype = fields.next()?;
    let options = fields.next().unwrap_or_default();

    Some(
        MountPoint::new(unescape(path), unescape(device), fstype)
            .with_options(options.split(',').filter(|opt| !opt.is_empty())),
    )
}

/// Keep only mounts with a device and a device-backed file system type.
#[must_use]
pub fn filter_physical(mounts: Vec<MountPoint>, physical: &HashSet<String>) -> Vec<MountPoint> {
    mounts
        .into_iter()
        .filter(|m| !m.device.is_empty() && m.device != "none")
        .filter(|m| physical.contains(&m.file_system))
        .collect()
}

/// Decode the octal escapes (`\040`, `\011`, `\012`, `\134`) the kernel
/// uses for whitespace and backslashes in mount table fields.
fn unescape(field: &str) -> String {
    if !field.contains('\\') {
        return field.to_string();
    }

    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' && i + 3 < bytes.len() && is_octal_escape(&bytes[i + 1..i + 4]) {
            let value =
                (bytes[i + 1] - b'0') * 64 + (bytes[i + 2] - b'0') * 8 + (bytes[i + 3] - b'0');
            out.push(value);
            i += 4;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn is_octal_escape(digits: &[u8]) -> bool {
    digits.len() == 3
        && digits.iter().all(|d| (b'0'..=b'7').contains(d))
        && digits[0] <= b'3'
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const FILESYSTEMS: &str = "nodev\tsysfs\nnodev\ttmpfs\nnodev\tproc\n\text4\n\tvfat\n\texfat\nnodev\tzfs\n";

    const MOUNTS: &str = "\
sysfs /sys sysfs rw,nosuid,nodev,noexec,relatime 0 0
proc /proc proc rw,nosuid,nodev,noexec,relatime 0 0
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
tmpfs /run tmpfs rw,nosuid,nodev,size=3268468k,mode=755 0 0
/dev/sdb1 /media/user/MY\\040STICK vfat rw,nosuid,nodev,relatime,uid=1000 0 0
";

    #[test]
    fn test_parse_physical_filesystems() {
        let physical = parse_physical_filesystems(FILESYSTEMS);
        assert!(physical.contains("ext4"));
        assert!(physical.contains("vfat"));
        assert!(physical.contains("zfs"));
        assert!(!physical.contains("tmpfs"));
        assert!(!physical.contains("sysfs"));
    }

    #[test]
    fn test_parse_mount_table_keeps_order() {
        let mounts = parse_mount_table(MOUNTS);
        assert_eq!(mounts.len(), 5);
        assert_eq!(mounts[0].path, Path::new("/sys"));
        assert_eq!(mounts[2].device, "/dev/nvme0n1p2");
        assert!(mounts[3].has_option("nosuid"));
    }

    #[test]
    fn test_parse_mount_table_unescapes_paths() {
        let mounts = parse_mount_table(MOUNTS);
        assert_eq!(mounts[4].path, Path::new("/media/user/MY STICK"));
        assert_eq!(mounts[4].file_system, "vfat");
    }

    #[test]
    fn test_parse_mount_table_skips_malformed_lines() {
        let mounts = parse_mount_table("garbage\n\n/dev/sdc1 /mnt/x ext4 rw 0 0\n");
        assert_eq!(mounts.len(), 1);
        assert_eq!(mounts[0].path, Path::new("/mnt/x"));
    }

    #[test]
    fn test_filter_physical_drops_pseudo_mounts() {
        let physical = parse_physical_filesystems(FILESYSTEMS);
        let mounts = filter_physical(parse_mount_table(MOUNTS), &physical);

        let paths: Vec<_> = mounts.iter().map(|m| m.path.clone()).collect();
        assert_eq!(
            paths,
            vec![Path::new("/").to_path_buf(), Path::new("/media/user/MY STICK").to_path_buf()]
        );
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("plain"), "plain");
        assert_eq!(unescape("a\\040b"), "a b");
        assert_eq!(unescape("tab\\011x"), "tab\tx");
        assert_eq!(unescape("back\\134slash"), "back\\slash");
        // Not a valid escape, kept literally
        assert_eq!(unescape("odd\\9"), "odd\\9");
    }
}
