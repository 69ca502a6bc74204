//! ertdrive Discovery Module
//!
//! Wallet file discovery on mounted volumes.

pub mod filesystem;
pub mod hidden;

// Re-export main types
pub use filesystem::{
    inspect_candidate, is_wallet_name, CandidateOutcome, ScanOptions, ScanSummary, WalletScanner,
    WALLET_EXTENSION,
};
pub use hidden::{is_dot_file, is_hidden};
