pub mod builder;

use std::time::Duration;

use channel_datastore::{DataStore, VideoRecord};
use tokio_util::sync::CancellationToken;

use crate::{
    error::Error,
    schedule::{self, Clock},
    state::PollState,
    yt::VideoProvider,
};

/// Outcome of one full pass over the channel list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub new_records: usize,
    pub channels_checked: usize,
    pub channels_skipped: usize,
}

// The core channel poller: walks the configured channels, asks the provider
// for each due channel's latest video, and appends anything unseen to the
// durable record log exactly once.
pub struct ChannelPoller<D, P, C>
where
    D: DataStore + Send + Sync + 'static,
    P: VideoProvider + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    store: D,
    provider: P,
    clock: C,
    channel_delay: chrono::Duration,
    state: PollState,
}

impl<D, P, C> ChannelPoller<D, P, C>
where
    D: DataStore + Send + Sync + 'static,
    P: VideoProvider + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Rebuilds the dedup index and channel map by replaying the record log.
    /// Must run once before the first cycle; running it again at any point
    /// reproduces the same state.
    #[tracing::instrument(skip_all)]
    pub async fn rebuild(&mut self) -> Result<(), Error> {
        let records = self
            .store
            .read_all_video_records()
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to read record log"))
            .map_err(Error::Rebuild)?;

        self.state = PollState::rebuild(&records);
        tracing::info!(
            known_links = self.state.known_links(),
            "Rebuilt poll state from record log"
        );
        Ok(())
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    /// One full pass over the channel list, in list order. Per-channel
    /// failures are logged and skipped; only an unreadable channel list
    /// aborts the cycle.
    #[tracing::instrument(skip_all)]
    pub async fn run_cycle(&mut self) -> Result<CycleReport, Error> {
        // Read fresh each cycle so operators can edit the list without a
        // restart.
        let channels = self
            .store
            .read_channel_list()
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to read channel list"))
            .map_err(Error::ChannelList)?;

        let now = self.clock.now_utc();
        let mut report = CycleReport::default();

        for channel in &channels {
            if !schedule::is_due(self.state.channel(channel), self.channel_delay, now) {
                tracing::debug!(%channel, "Not due yet");
                report.channels_skipped += 1;
                continue;
            }
            report.channels_checked += 1;

            let video = match self.provider.latest_video(channel).await {
                Ok(Some(video)) => video,
                Ok(None) => {
                    tracing::debug!(%channel, "No video found");
                    continue;
                }
                Err(e) => {
                    tracing::warn!(error = ?e, %channel, "Provider lookup failed, skipping channel");
                    continue;
                }
            };

            if self.state.contains(&video.link) {
                tracing::debug!(%channel, link = %video.link, "Already recorded");
                continue;
            }

            let record = VideoRecord {
                channel_id: channel.clone(),
                video_link: video.link,
                upload_time: video.upload_time,
                title: video.title,
                view_count: video.view_count,
                tags: video.tags,
            };

            // Persist before touching the in-memory state; on failure the
            // same video is retried on the channel's next due cycle.
            if let Err(e) = self.store.append_video_record(&record).await {
                tracing::error!(
                    error = ?e,
                    link = %record.video_link,
                    "Failed to persist record, leaving channel state untouched"
                );
                continue;
            }

            tracing::info!(%channel, link = %record.video_link, "Recorded new video");
            self.state.commit(&record);
            report.new_records += 1;
        }

        tracing::info!(
            new_records = report.new_records,
            checked = report.channels_checked,
            skipped = report.channels_skipped,
            "Poll cycle complete"
        );
        Ok(report)
    }

    /// Repeats `run_cycle` on a fixed interval until the token is cancelled.
    /// The inter-cycle sleep is the only suspension point; cancellation
    /// interrupts it immediately, and everything recorded so far is already
    /// durable by then.
    pub async fn run_until_cancelled(
        mut self,
        poll_interval: Duration,
        shutdown: CancellationToken,
    ) -> Result<(), Error> {
        self.rebuild().await?;

        loop {
            if let Err(e) = self.run_cycle().await {
                tracing::error!(error = ?e, "Poll cycle failed, retrying next interval");
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("Shutdown requested, stopping poll loop");
                    return Ok(());
                }
                _ = tokio::time::sleep(poll_interval) => {}
            }
        }
    }
}
