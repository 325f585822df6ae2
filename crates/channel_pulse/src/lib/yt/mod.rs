pub mod data_api;

use std::future::Future;

use serde::{Deserialize, Serialize};

/// The most recently published video the provider could see for a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestVideo {
    pub video_id: String,
    /// Full watch URL. Literal equality on this string is the dedup key.
    pub link: String,
    /// `publishedAt` exactly as returned, RFC 3339.
    pub upload_time: String,
    pub title: Option<String>,
    pub view_count: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response: {0}")]
    Malformed(&'static str),
    #[error("Unsupported channel reference: {0}")]
    UnsupportedChannel(String),
}

/// Source of channel metadata. `Ok(None)` means the channel currently has no
/// visible content; an `Err` is a transient lookup failure. The poll cycle
/// treats both as soft, per-channel conditions.
pub trait VideoProvider {
    fn latest_video(
        &self,
        channel: &str,
    ) -> impl Future<Output = Result<Option<LatestVideo>, ProviderError>> + Send;
}

impl<T: VideoProvider + Send + Sync> VideoProvider for &T {
    async fn latest_video(&self, channel: &str) -> Result<Option<LatestVideo>, ProviderError> {
        (**self).latest_video(channel).await
    }
}
