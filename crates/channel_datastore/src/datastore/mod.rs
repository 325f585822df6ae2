use std::future::Future;

pub mod postgres;

pub trait DataStore {
    /// Reads the entire append-only video record log, oldest first.
    fn read_all_video_records(
        &self,
    ) -> impl Future<Output = anyhow::Result<Vec<crate::VideoRecord>>> + Send;

    /// Appends a single record to the log. The insert is atomic; a link that
    /// already exists in the log is left untouched.
    fn append_video_record(
        &self,
        record: &crate::VideoRecord,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Reads the current set of tracked channels, in operator-defined order.
    fn read_channel_list(&self) -> impl Future<Output = anyhow::Result<Vec<String>>> + Send;
}

impl<T: DataStore + Send + Sync> DataStore for &T {
    async fn read_all_video_records(&self) -> anyhow::Result<Vec<crate::VideoRecord>> {
        (**self).read_all_video_records().await
    }

    async fn append_video_record(&self, record: &crate::VideoRecord) -> anyhow::Result<()> {
        (**self).append_video_record(record).await
    }

    async fn read_channel_list(&self) -> anyhow::Result<Vec<String>> {
        (**self).read_channel_list().await
    }
}
