//! Per-channel re-check scheduling.

use chrono::{DateTime, Duration, Utc};

use crate::state::ChannelRecord;

/// Time source for the scheduler, injectable so tests control the clock.
pub trait Clock {
    fn now_utc(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Decides whether a channel is eligible for a provider query.
///
/// The delay is anchored to the last known *upload* time, not the last check:
/// a channel with a fresh upload stays throttled no matter how often the loop
/// runs, while one with stale data is queried every cycle. A channel with no
/// record, or a record whose stored timestamp did not parse, is always due so
/// that first runs and corrupted state never starve a channel.
pub fn is_due(record: Option<&ChannelRecord>, channel_delay: Duration, now: DateTime<Utc>) -> bool {
    match record.and_then(|r| r.last_upload_time) {
        Some(last_upload) => now - last_upload >= channel_delay,
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_uploaded_at(last_upload_time: Option<DateTime<Utc>>) -> ChannelRecord {
        ChannelRecord {
            last_video_link: "https://www.youtube.com/watch?v=a".into(),
            last_upload_time,
        }
    }

    #[test]
    fn within_delay_window_is_not_due() {
        let now = Utc::now();
        let record = record_uploaded_at(Some(now - Duration::hours(10)));
        assert!(!is_due(Some(&record), Duration::hours(12), now));
    }

    #[test]
    fn past_delay_window_is_due() {
        let now = Utc::now();
        let record = record_uploaded_at(Some(now - Duration::hours(13)));
        assert!(is_due(Some(&record), Duration::hours(12), now));
    }

    #[test]
    fn exactly_at_delay_boundary_is_due() {
        let now = Utc::now();
        let record = record_uploaded_at(Some(now - Duration::hours(12)));
        assert!(is_due(Some(&record), Duration::hours(12), now));
    }

    #[test]
    fn unknown_channel_is_always_due() {
        assert!(is_due(None, Duration::hours(12), Utc::now()));
        assert!(is_due(None, Duration::hours(10_000), Utc::now()));
    }

    #[test]
    fn record_without_timestamp_is_due() {
        let record = record_uploaded_at(None);
        assert!(is_due(Some(&record), Duration::hours(12), Utc::now()));
    }
}
