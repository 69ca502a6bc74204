//! Drive watcher: polls for removable drives and reports transitions.

use crate::observation::{Observation, ObservationSink, TracingSink};
use ertdrive_device::DeviceLocator;
use ertdrive_discovery::WalletScanner;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default poll interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

/// What the watcher remembers between polls.
///
/// Starts absent. Only the watcher task holds one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchState {
    mount: Option<PathBuf>,
    wallet_reported: bool,
}

impl WatchState {
    /// Mount path seen on the last poll.
    #[must_use]
    pub fn mount(&self) -> Option<&Path> {
        self.mount.as_deref()
    }

    /// Whether a wallet has been reported for the current mount.
    #[must_use]
    pub fn wallet_reported(&self) -> bool {
        self.wallet_reported
    }
}

/// Periodic device poller.
pub struct DriveWatcher {
    locator: DeviceLocator,
    scanner: WalletScanner,
    interval: Duration,
    sink: Arc<dyn ObservationSink>,
}

impl DriveWatcher {
    /// Watcher that logs through `tracing` every [`DEFAULT_INTERVAL`].
    #[must_use]
    pub fn new(locator: DeviceLocator, scanner: WalletScanner) -> Self {
        Self {
            locator,
            scanner,
            interval: DEFAULT_INTERVAL,
            sink: Arc::new(TracingSink),
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl ObservationSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    /// Run one poll against `state`, emit any transition, and return it.
    ///
    /// Locator failures are logged and count as "no device"; a poll never
    /// fails.
    pub async fn poll(&self, state: &mut WatchState) -> Option<Observation> {
        let current = match self.locator.locate_async().await {
            Ok(mount) => mount.map(|m| m.path),
            Err(e) => {
                warn!("Drive enumeration failed, treating as no drive: {}", e);
                None
            }
        };

        let observation = match current {
            None => {
                let was_present = state.mount.is_some();
                *state = WatchState::default();
                was_present.then_some(Observation::DeviceRemoved)
            }
            Some(mount) if state.mount.as_ref() == Some(&mount) => {
                if state.wallet_reported {
                    None
                } else {
                    // Same drive, nothing reported yet: a wallet may have been copied on since
                    let found = self.scanner.scan(&mount).await.is_some();
                    state.wallet_reported = found;
                    found.then_some(Observation::WalletDetected { mount })
                }
            }
            Some(mount) => {
                let found = self.scanner.scan(&mount).await.is_some();
                let observation = if found {
                    Observation::WalletDetected {
                        mount: mount.clone(),
                    }
                } else {
                    Observation::NoWalletOnDevice {
                        mount: mount.clone(),
                    }
                };
                *state = WatchState {
                    mount: Some(mount),
                    wallet_reported: found,
                };
                Some(observation)
            }
        };

        if let Some(observation) = &observation {
            self.sink.observe(observation);
        } else {
            debug!("No drive transition");
        }
        observation
    }

    /// Poll until `cancel` fires.
    ///
    /// A poll still in flight when `cancel` fires is dropped, so shutdown
    /// never waits for a slow enumeration or scan to finish.
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut state = WatchState::default();

        info!("Drive watcher started (interval {:?})", self.interval);
        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("Poll abandoned on shutdown");
                    break;
                }
                _ = self.poll(&mut state) => {}
            }
        }
        info!("Drive watcher stopped");
    }

    /// Spawn [`run`](Self::run) on the current runtime.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }
}

impl std::fmt::Debug for DriveWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveWatcher")
            .field("locator", &self.locator)
            .field("scanner", &self.scanner)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}
