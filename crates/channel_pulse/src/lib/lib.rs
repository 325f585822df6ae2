mod error;
mod poller;
pub mod schedule;
pub mod state;
pub mod tracing;
pub mod yt;

pub use error::Error;
pub use poller::{builder::ChannelPollerBuilder, ChannelPoller, CycleReport};
pub use yt::{data_api::DataApiClient, LatestVideo, ProviderError, VideoProvider};
