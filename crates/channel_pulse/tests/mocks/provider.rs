use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use channel_pulse::{LatestVideo, ProviderError, VideoProvider};

#[derive(Clone, Default)]
pub struct MockProvider {
    pub videos: HashMap<String, LatestVideo>,
    pub failing: HashSet<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl MockProvider {
    pub fn with_video(mut self, channel: &str, video: LatestVideo) -> Self {
        self.videos.insert(channel.to_string(), video);
        self
    }

    pub fn failing_for(mut self, channel: &str) -> Self {
        self.failing.insert(channel.to_string());
        self
    }
}

pub fn latest_video(video_id: &str, upload_time: &str) -> LatestVideo {
    LatestVideo {
        video_id: video_id.to_string(),
        link: format!("https://www.youtube.com/watch?v={video_id}"),
        upload_time: upload_time.to_string(),
        title: Some(format!("Video {video_id}")),
        view_count: Some("1234".to_string()),
        tags: vec!["news".to_string()],
    }
}

impl VideoProvider for MockProvider {
    async fn latest_video(&self, channel: &str) -> Result<Option<LatestVideo>, ProviderError> {
        self.calls.lock().unwrap().push(channel.to_string());
        if self.failing.contains(channel) {
            return Err(ProviderError::Api {
                status: 503,
                message: "mock provider failure".to_string(),
            });
        }
        Ok(self.videos.get(channel).cloned())
    }
}
