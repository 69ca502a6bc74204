//! Observation types and sinks.

use std::fmt;
use std::path::PathBuf;
use tokio::sync::mpsc;

/// A change in removable-drive presence noticed by the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    WalletDetected { mount: PathBuf },
    NoWalletOnDevice { mount: PathBuf },
    DeviceRemoved,
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WalletDetected { mount } => write!(f, "wallet detected on {}", mount.display()),
            Self::NoWalletOnDevice { mount } => write!(
                f,
                "USB detected but no wallet found on {}",
                mount.display()
            ),
            Self::DeviceRemoved => f.write_str("no USB drive detected"),
        }
    }
}

/// Where observations go.
pub trait ObservationSink: Send + Sync {
    fn observe(&self, observation: &Observation);
}

/// Logs observations at `info`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ObservationSink for TracingSink {
    fn observe(&self, observation: &Observation) {
        tracing::info!(target: "ertdrive::watch", "{observation}");
    }
}

/// Forwards observations into a channel. Observations are dropped once the
/// receiver is gone.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Observation>,
}

impl ChannelSink {
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Observation>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ObservationSink for ChannelSink {
    fn observe(&self, observation: &Observation) {
        let _ = self.tx.send(observation.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observation_messages() {
        let mount = PathBuf::from("/media/usb");
        assert_eq!(
            Observation::WalletDetected {
                mount: mount.clone()
            }
            .to_string(),
            "wallet detected on /media/usb"
        );
        assert_eq!(
            Observation::NoWalletOnDevice { mount }.to_string(),
            "USB detected but no wallet found on /media/usb"
        );
        assert_eq!(
            Observation::DeviceRemoved.to_string(),
            "no USB drive detected"
        );
    }

    #[test]
    fn test_channel_sink_forwards() {
        let (sink, mut rx) = ChannelSink::new();
        sink.observe(&Observation::DeviceRemoved);
        assert_eq!(rx.try_recv().ok(), Some(Observation::DeviceRemoved));
    }

    #[test]
    fn test_channel_sink_survives_closed_receiver() {
        let (sink, rx) = ChannelSink::new();
        drop(rx);
        sink.observe(&Observation::DeviceRemoved);
    }
}
