//! Hidden-file classification.
//!
//! Hidden status never excludes a wallet file; it is carried on the
//! resulting record and logged.

use std::path::Path;

/// Windows `FILE_ATTRIBUTE_HIDDEN` bit.
#[cfg(windows)]
const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

/// Whether the host file system considers `path` hidden.
///
/// On Windows this reads the hidden attribute bit; a failed attribute
/// query counts as not hidden. Elsewhere a leading `.` in the file name
/// marks the file hidden.
#[cfg(windows)]
pub async fn is_hidden(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;

    match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0,
        Err(e) => {
            tracing::debug!("Attribute query failed for {}: {}", path.display(), e);
            false
        }
    }
}

/// Whether the host file system considers `path` hidden.
///
/// On Windows this reads the hidden attribute bit; a failed attribute
/// query counts as not hidden. Elsewhere a leading `.` in the file name
/// marks the file hidden.
#[cfg(not(windows))]
#[allow(clippy::unused_async)]
pub async fn is_hidden(path: &Path) -> bool {
    is_dot_file(path)
}

/// POSIX convention: names starting with `.` are hidden.
#[must_use]
pub fn is_dot_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_file() {
        assert!(is_dot_file(Path::new("/media/usb/.wallet.ert")));
        assert!(is_dot_file(Path::new(".ert")));
        assert!(!is_dot_file(Path::new("/media/.hidden-dir/wallet.ert")));
        assert!(!is_dot_file(Path::new("wallet.ert")));
    }

    #[cfg(not(windows))]
    #[tokio::test]
    async fn test_is_hidden_uses_name_on_posix() {
        assert!(is_hidden(Path::new("/nonexistent/.w.ert")).await);
        assert!(!is_hidden(Path::new("/nonexistent/w.ert")).await);
    }

    #[cfg(windows)]
    #[tokio::test]
    async fn test_attribute_query_failure_is_not_hidden() {
        assert!(!is_hidden(Path::new("Z:\\definitely\\missing\\w.ert")).await);
    }
}
