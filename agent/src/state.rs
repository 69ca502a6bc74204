//! Application state management.

use ertdrive_device::DeviceLocator;
use ertdrive_discovery::WalletScanner;

/// Handles shared by every request handler.
///
/// Holds no mutable state; each request re-enumerates volumes and rescans.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Finds the removable volume to search
    pub locator: DeviceLocator,
    /// Searches a volume for wallet files
    pub scanner: WalletScanner,
}

impl AppState {
    pub fn new(locator: DeviceLocator, scanner: WalletScanner) -> Self {
        Self { locator, scanner }
    }
}
