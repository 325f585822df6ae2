//! In-memory poll state: the dedup index and the per-channel tracking map.
//!
//! Both are derived caches over the durable record log. They are rebuilt by
//! replaying the log at startup, which keeps duplicate suppression correct
//! across restarts and crashes mid-cycle.

use std::collections::{HashMap, HashSet};

use channel_datastore::VideoRecord;
use chrono::{DateTime, Utc};

/// What we last recorded for one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRecord {
    pub last_video_link: String,
    /// `None` when the stored upload time did not parse; the scheduler then
    /// treats the channel as never checked.
    pub last_upload_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollState {
    seen_links: HashSet<String>,
    channels: HashMap<String, ChannelRecord>,
}

impl PollState {
    /// Replays the log, oldest entry first. Later entries win the channel
    /// map, matching what a live sequence of commits would have produced.
    pub fn rebuild(records: &[VideoRecord]) -> Self {
        let mut state = PollState::default();
        for record in records {
            state.commit(record);
        }
        state
    }

    pub fn contains(&self, video_link: &str) -> bool {
        self.seen_links.contains(video_link)
    }

    pub fn channel(&self, channel_id: &str) -> Option<&ChannelRecord> {
        self.channels.get(channel_id)
    }

    /// Folds a record into the index and the channel map. Callers commit only
    /// after the record is durably in the log, so the cache never gets ahead
    /// of persistent state.
    pub fn commit(&mut self, record: &VideoRecord) {
        self.seen_links.insert(record.video_link.clone());
        self.channels.insert(
            record.channel_id.clone(),
            ChannelRecord {
                last_video_link: record.video_link.clone(),
                last_upload_time: record.upload_timestamp(),
            },
        );
    }

    pub fn known_links(&self) -> usize {
        self.seen_links.len()
    }
}
