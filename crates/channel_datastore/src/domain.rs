use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One discovered video. Created exactly once per distinct `video_link`,
/// never mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct VideoRecord {
    pub channel_id: String,
    /// Dedup key. Compared by literal string equality, no normalization.
    pub video_link: String,
    /// `publishedAt` as the provider returned it (RFC 3339). Kept verbatim so
    /// a value we cannot parse degrades gracefully instead of failing a read.
    pub upload_time: String,
    pub title: Option<String>,
    pub view_count: Option<String>,
    pub tags: Vec<String>,
}

impl VideoRecord {
    /// Parses the stored upload time. `None` means the stored text is not
    /// valid RFC 3339; callers treat that channel as never checked.
    pub fn upload_timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.upload_time)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}
