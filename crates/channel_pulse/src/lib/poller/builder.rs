use channel_datastore::DataStore;

use crate::{
    schedule::Clock,
    state::PollState,
    yt::VideoProvider,
    ChannelPoller,
};

pub struct ChannelPollerBuilder<D = (), P = (), C = ()> {
    store: D,
    provider: P,
    clock: C,
    channel_delay: chrono::Duration,
}

impl ChannelPollerBuilder {
    pub fn new() -> Self {
        Self {
            store: (),
            provider: (),
            clock: (),
            channel_delay: chrono::Duration::hours(12),
        }
    }
}

impl Default for ChannelPollerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<D, P, C> ChannelPollerBuilder<D, P, C> {
    pub fn store<D2: DataStore + Send + Sync + 'static>(
        self,
        store: D2,
    ) -> ChannelPollerBuilder<D2, P, C> {
        ChannelPollerBuilder {
            store,
            provider: self.provider,
            clock: self.clock,
            channel_delay: self.channel_delay,
        }
    }

    pub fn provider<P2: VideoProvider + Send + Sync + 'static>(
        self,
        provider: P2,
    ) -> ChannelPollerBuilder<D, P2, C> {
        ChannelPollerBuilder {
            store: self.store,
            provider,
            clock: self.clock,
            channel_delay: self.channel_delay,
        }
    }

    pub fn clock<C2: Clock + Send + Sync + 'static>(
        self,
        clock: C2,
    ) -> ChannelPollerBuilder<D, P, C2> {
        ChannelPollerBuilder {
            store: self.store,
            provider: self.provider,
            clock,
            channel_delay: self.channel_delay,
        }
    }

    /// Minimum time between provider queries for a channel with a known last
    /// upload.
    pub fn channel_delay(mut self, channel_delay: chrono::Duration) -> Self {
        self.channel_delay = channel_delay;
        self
    }
}

impl<D, P, C> ChannelPollerBuilder<D, P, C>
where
    D: DataStore + Send + Sync + 'static,
    P: VideoProvider + Send + Sync + 'static,
    C: Clock + Send + Sync + 'static,
{
    /// Builds the poller with empty in-memory state. Call
    /// [`ChannelPoller::rebuild`] before the first cycle to replay the log.
    pub fn build(self) -> ChannelPoller<D, P, C> {
        ChannelPoller {
            store: self.store,
            provider: self.provider,
            clock: self.clock,
            channel_delay: self.channel_delay,
            state: PollState::default(),
        }
    }
}
