//! YouTube Data API v3 video provider.
//!
//! Resolves a channel reference (full URL, handle, or bare channel id) to a
//! channel id, asks the search endpoint for the single most recent video, and
//! enriches it with view count, tags and duration from the videos endpoint.

use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use reqwest_retry_after::RetryAfterMiddleware;
use serde_json::Value;

use crate::yt::{LatestVideo, ProviderError, VideoProvider};

pub struct DataApiClient {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    include_shorts: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum ChannelRef {
    Id(String),
    Handle(String),
}

impl DataApiClient {
    const WATCH_URL: &'static str = "https://www.youtube.com/watch";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        // Every request gets a bounded timeout; a hung call then surfaces as
        // a provider error for that one channel instead of stalling the
        // whole sequential cycle.
        let http = reqwest::Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(http)
            .with(RetryAfterMiddleware::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: "https://www.googleapis.com/youtube/v3".into(),
            include_shorts: false,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_shorts(mut self, include_shorts: bool) -> Self {
        self.include_shorts = include_shorts;
        self
    }

    async fn get_json(&self, url: &str) -> Result<Value, ProviderError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json::<Value>().await?)
    }

    /// Turns a channel reference into a channel id, hitting the API only for
    /// handles.
    async fn resolve_channel_id(&self, channel: &str) -> Result<String, ProviderError> {
        let handle = match classify_channel_ref(channel)? {
            ChannelRef::Id(id) => return Ok(id),
            ChannelRef::Handle(handle) => handle,
        };

        let url = format!(
            "{}/channels?part=id&forHandle=@{}&key={}",
            self.base_url, handle, self.api_key
        );
        let json = self.get_json(&url).await?;

        json["items"]
            .get(0)
            .and_then(|item| item["id"].as_str())
            .map(str::to_string)
            .ok_or(ProviderError::Malformed("No channel id for handle"))
    }

    /// Fetches view count, tags and duration for a video. Failures here are
    /// soft: the video is still worth recording without enrichment.
    async fn fetch_video_details(
        &self,
        video_id: &str,
    ) -> Result<(Option<String>, Vec<String>, Option<String>), ProviderError> {
        let url = format!(
            "{}/videos?part=snippet,statistics,contentDetails&id={}&key={}",
            self.base_url, video_id, self.api_key
        );
        let json = self.get_json(&url).await?;

        let Some(item) = json["items"].get(0) else {
            return Ok((None, vec![], None));
        };

        let view_count = item["statistics"]["viewCount"].as_str().map(str::to_string);
        let tags = item["snippet"]["tags"]
            .as_array()
            .map(|tags| {
                tags.iter()
                    .filter_map(|t| t.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();
        let duration = item["contentDetails"]["duration"]
            .as_str()
            .map(str::to_string);

        Ok((view_count, tags, duration))
    }
}

impl VideoProvider for DataApiClient {
    #[tracing::instrument(skip(self))]
    async fn latest_video(&self, channel: &str) -> Result<Option<LatestVideo>, ProviderError> {
        let channel_id = self.resolve_channel_id(channel).await?;

        let url = format!(
            "{}/search?part=snippet&channelId={}&maxResults=1&order=date&type=video&key={}",
            self.base_url, channel_id, self.api_key
        );
        let json = self.get_json(&url).await?;

        let Some(item) = json["items"].get(0) else {
            return Ok(None);
        };

        let video_id = item["id"]["videoId"]
            .as_str()
            .ok_or(ProviderError::Malformed("No videoId in search result"))?;
        let upload_time = item["snippet"]["publishedAt"]
            .as_str()
            .ok_or(ProviderError::Malformed("No publishedAt in search result"))?;
        let title = item["snippet"]["title"].as_str().map(str::to_string);

        // Enrichment is best-effort
        let (view_count, tags, duration) = match self.fetch_video_details(video_id).await {
            Ok(details) => details,
            Err(e) => {
                tracing::warn!(error = ?e, video_id, "Failed to fetch video details");
                (None, vec![], None)
            }
        };

        if !self.include_shorts && is_short(duration.as_deref()) {
            tracing::debug!(video_id, "Skipping short-form video");
            return Ok(None);
        }

        Ok(Some(LatestVideo {
            video_id: video_id.to_string(),
            link: format!("{}?v={}", Self::WATCH_URL, video_id),
            upload_time: upload_time.to_string(),
            title,
            view_count,
            tags,
        }))
    }
}

fn classify_channel_ref(channel: &str) -> Result<ChannelRef, ProviderError> {
    if let Some((_, id)) = channel.split_once("/channel/") {
        return Ok(ChannelRef::Id(id.trim_end_matches('/').to_string()));
    }
    if let Some((_, handle)) = channel.rsplit_once("/@") {
        return Ok(ChannelRef::Handle(handle.trim_end_matches('/').to_string()));
    }
    if let Some(handle) = channel.strip_prefix('@') {
        return Ok(ChannelRef::Handle(handle.to_string()));
    }
    if !channel.is_empty() && !channel.contains('/') {
        return Ok(ChannelRef::Id(channel.to_string()));
    }
    Err(ProviderError::UnsupportedChannel(channel.to_string()))
}

const SHORT_MAX_SECS: u64 = 60;

/// The Data API has no shorts filter, so confirmed short durations are
/// treated as no content. An unparsable duration keeps the video.
fn is_short(duration: Option<&str>) -> bool {
    duration
        .and_then(parse_iso8601_duration_secs)
        .is_some_and(|secs| secs <= SHORT_MAX_SECS)
}

fn parse_iso8601_duration_secs(duration: &str) -> Option<u64> {
    let rest = duration.strip_prefix("PT")?;
    let mut secs = 0u64;
    let mut digits = String::new();
    for c in rest.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else {
            let n: u64 = digits.parse().ok()?;
            digits.clear();
            let component = match c {
                'H' => n.checked_mul(3600)?,
                'M' => n.checked_mul(60)?,
                'S' => n,
                _ => return None,
            };
            secs = secs.checked_add(component)?;
        }
    }
    if !digits.is_empty() {
        return None;
    }
    Some(secs)
}
