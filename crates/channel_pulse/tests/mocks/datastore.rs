use std::sync::{Arc, Mutex};

use channel_datastore::{DataStore, VideoRecord};

#[derive(Clone, Default)]
pub struct MockDataStore {
    pub channels: Vec<String>,
    pub log: Arc<Mutex<Vec<VideoRecord>>>,
    pub fail_append: Arc<Mutex<Option<String>>>,
    pub fail_channel_list: Option<String>,
}

impl MockDataStore {
    pub fn with_channels(channels: &[&str]) -> Self {
        Self {
            channels: channels.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn seeded(channels: &[&str], log: Vec<VideoRecord>) -> Self {
        Self {
            channels: channels.iter().map(|c| c.to_string()).collect(),
            log: Arc::new(Mutex::new(log)),
            ..Default::default()
        }
    }

    pub fn failing_append(mut self, msg: &str) -> Self {
        self.fail_append = Arc::new(Mutex::new(Some(msg.to_string())));
        self
    }

    pub fn failing_channel_list(mut self, msg: &str) -> Self {
        self.fail_channel_list = Some(msg.to_string());
        self
    }
}

impl DataStore for MockDataStore {
    async fn read_all_video_records(&self) -> anyhow::Result<Vec<VideoRecord>> {
        Ok(self.log.lock().unwrap().clone())
    }

    async fn append_video_record(&self, record: &VideoRecord) -> anyhow::Result<()> {
        if let Some(ref msg) = *self.fail_append.lock().unwrap() {
            return Err(anyhow::anyhow!("{}", msg));
        }
        let mut log = self.log.lock().unwrap();
        // same semantics as the unique constraint: a known link is a no-op
        if !log.iter().any(|r| r.video_link == record.video_link) {
            log.push(record.clone());
        }
        Ok(())
    }

    async fn read_channel_list(&self) -> anyhow::Result<Vec<String>> {
        if let Some(ref msg) = self.fail_channel_list {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(self.channels.clone())
    }
}
