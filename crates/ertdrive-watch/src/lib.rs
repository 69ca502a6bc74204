pub mod observation;
pub mod watcher;

pub use observation::{ChannelSink, Observation, ObservationSink, TracingSink};
pub use watcher::{DriveWatcher, WatchState, DEFAULT_INTERVAL};
