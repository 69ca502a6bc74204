//! Filesystem wallet discovery scanner
//!
//! Walks a mounted volume looking for wallet files and returns the trimmed
//! content of the first non-empty one.
//!
//! Within each directory the wallet candidates are examined in the order
//! `read_dir` yields them, before any subdirectory is entered. `read_dir`
//! order is file system dependent and not sorted, so when a volume holds
//! several wallet files which one wins can differ between platforms.

use ertdrive_core::{ScanConfig, WalletRecord};
use std::fs::FileType;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use crate::hidden::is_hidden;

/// Maximum directory depth to scan
const MAX_SCAN_DEPTH: usize = 32;

/// Maximum file size to read (16MB)
const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Extension that marks a wallet file, without the dot.
pub const WALLET_EXTENSION: &str = "ert";

/// How far to look.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory levels below the root that are still visited
    pub max_depth: usize,
    /// Larger candidates are skipped unread
    pub max_file_bytes: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_SCAN_DEPTH,
            max_file_bytes: MAX_FILE_SIZE,
        }
    }
}

impl From<&ScanConfig> for ScanOptions {
    fn from(config: &ScanConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_file_bytes: config.max_file_bytes,
        }
    }
}

/// Check if a file name ends with `.ert`.
///
/// Compares the raw name bytes, so names that are not valid UTF-8 still
/// qualify. The match is exact except on Windows, where the file system
/// itself folds ASCII case.
#[must_use]
pub fn is_wallet_name(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.as_encoded_bytes();
    let ext = WALLET_EXTENSION.as_bytes();
    if name.len() < ext.len() + 1 {
        return false;
    }
    let (head, suffix) = name.split_at(name.len() - ext.len());
    head.ends_with(b".") && extension_eq(suffix, ext)
}

#[cfg(windows)]
fn extension_eq(suffix: &[u8], ext: &[u8]) -> bool {
    suffix.eq_ignore_ascii_case(ext)
}

#[cfg(not(windows))]
fn extension_eq(suffix: &[u8], ext: &[u8]) -> bool {
    suffix == ext
}

/// Why a wallet-named entry was or was not accepted.
#[derive(Debug)]
pub enum CandidateOutcome {
    /// Non-empty content; the scan stops here
    Match(WalletRecord),
    /// Readable but empty after trimming
    Blank,
    /// Directory, symlink, device node or other non-regular entry
    NotRegularFile,
    /// Larger than `max_file_bytes`
    TooLarge(u64),
    /// Metadata or content could not be read (including non-UTF-8 content)
    Unreadable(std::io::Error),
}

/// Tally of one scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// First qualifying wallet, if any
    pub record: Option<WalletRecord>,
    /// Wallet-named entries examined
    pub candidates: usize,
    /// Candidates that were empty after trimming
    pub blank: usize,
    /// Candidates that were not regular files or were too large
    pub skipped: usize,
    /// Candidates that failed to read
    pub unreadable: usize,
}

impl ScanSummary {
    fn record_outcome(&mut self, path: &Path, outcome: CandidateOutcome) -> bool {
        self.candidates += 1;
        match outcome {
            CandidateOutcome::Match(record) => {
                self.record = Some(record);
                return true;
            }
            CandidateOutcome::Blank => {
                debug!("Skipping blank wallet file: {}", path.display());
                self.blank += 1;
            }
            CandidateOutcome::NotRegularFile => {
                debug!("Skipping non-regular entry: {}", path.display());
                self.skipped += 1;
            }
            CandidateOutcome::TooLarge(len) => {
                debug!(
                    "Skipping large file ({}MB): {}",
                    len / 1024 / 1024,
                    path.display()
                );
                self.skipped += 1;
            }
            CandidateOutcome::Unreadable(e) => {
                debug!("Failed to read wallet file {}: {}", path.display(), e);
                self.unreadable += 1;
            }
        }
        false
    }
}

/// Inspect one wallet-named path.
///
/// Symlinks are classified as non-regular and never followed.
pub async fn inspect_candidate(path: &Path, options: &ScanOptions) -> CandidateOutcome {
    let metadata = match fs::symlink_metadata(path).await {
        Ok(m) => m,
        Err(e) => return CandidateOutcome::Unreadable(e),
    };

    if !metadata.file_type().is_file() {
        return CandidateOutcome::NotRegularFile;
    }

    if metadata.len() > options.max_file_bytes {
        return CandidateOutcome::TooLarge(metadata.len());
    }

    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) => return CandidateOutcome::Unreadable(e),
    };

    let trimmed = contents.trim();
    if trimmed.is_empty() {
        return CandidateOutcome::Blank;
    }

    let hidden = is_hidden(path).await;
    CandidateOutcome::Match(WalletRecord::new(trimmed.to_string(), path, hidden))
}

/// Searches a mounted volume for the first non-empty wallet file.
#[derive(Debug, Clone, Default)]
pub struct WalletScanner {
    options: ScanOptions,
}

impl WalletScanner {
    /// Create a scanner with explicit options.
    #[must_use]
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// First non-empty wallet under `root`, or `None`.
    ///
    /// A missing or inaccessible root is `None`, the same as an empty volume.
    pub async fn scan(&self, root: &Path) -> Option<WalletRecord> {
        self.scan_detailed(root).await.record
    }

    /// Like [`scan`](Self::scan) but also reports what was skipped.
    pub async fn scan_detailed(&self, root: &Path) -> ScanSummary {
        let mut summary = ScanSummary::default();
        scan_directory_impl(root, &self.options, self.options.max_depth, &mut summary).await;

        match &summary.record {
            Some(record) => info!(
                "Wallet file found at {} (hidden: {})",
                record.source().display(),
                record.is_hidden()
            ),
            None => debug!(
                "No wallet under {} ({} candidates, {} blank, {} skipped, {} unreadable)",
                root.display(),
                summary.candidates,
                summary.blank,
                summary.skipped,
                summary.unreadable
            ),
        }
        summary
    }
}

/// Internal implementation that boxes the future to handle recursion with depth limiting.
///
/// Resolves to `true` once a match has been recorded so callers stop walking.
fn scan_directory_impl<'a>(
    dir: &'a Path,
    options: &'a ScanOptions,
    max_depth: usize,
    summary: &'a mut ScanSummary,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = bool> + Send + 'a>> {
    Box::pin(async move {
        if max_depth == 0 {
            debug!("Max depth reached, skipping: {}", dir.display());
            return false;
        }

        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read directory {}: {}", dir.display(), e);
                return false;
            }
        };

        let mut listed: Vec<(PathBuf, FileType)> = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => match entry.file_type().await {
                    Ok(file_type) => listed.push((entry.path(), file_type)),
                    Err(e) => {
                        let path = entry.path();
                        if is_wallet_name(&path)
                            && summary.record_outcome(&path, CandidateOutcome::Unreadable(e))
                        {
                            return true;
                        }
                    }
                },
                Ok(None) => break,
                Err(e) => {
                    debug!("Stopped listing {}: {}", dir.display(), e);
                    break;
                }
            }
        }

        for (path, _) in listed.iter().filter(|(p, _)| is_wallet_name(p)) {
            let outcome = inspect_candidate(path, options).await;
            if summary.record_outcome(path, outcome) {
                return true;
            }
        }

        // Symlinked directories are never entered, which also rules out loops
        for (path, file_type) in &listed {
            if file_type.is_dir()
                && scan_directory_impl(path, options, max_depth - 1, summary).await
            {
                return true;
            }
        }

        false
    })
}
