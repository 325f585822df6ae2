/// Cycle-level failures. Anything per-channel (provider, persistence) is
/// logged and absorbed inside the cycle instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read channel list: {0}")]
    ChannelList(anyhow::Error),
    #[error("Failed to rebuild poll state from the record log: {0}")]
    Rebuild(anyhow::Error),
}
