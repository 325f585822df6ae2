use anyhow::Context;
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};

use crate::datastore::DataStore;

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Clone)]
pub struct PgDataStore {
    pub pool: PgPool,
}

impl PgDataStore {
    /// Establish connection to database and create the record/channel tables
    /// if not exists
    pub async fn init(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .inspect_err(
                |e| tracing::error!(error = ?e, "Failed to establish connection to database"),
            )
            .context("Failed to connect to postgres database")?;

        MIGRATOR
            .run(&pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to run database migrations"))
            .context("Failed to run database migrations")?;

        Ok(PgDataStore { pool })
    }
}

impl DataStore for PgDataStore {
    async fn read_all_video_records(&self) -> anyhow::Result<Vec<crate::VideoRecord>> {
        let records = sqlx::query_as::<_, crate::VideoRecord>(
            r#"
            SELECT channel_id, video_link, upload_time, title, view_count, tags
            FROM video_records
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(error = ?e, "Failed to read video record log");
        })
        .context("Failed to read video record log")?;

        Ok(records)
    }

    async fn append_video_record(&self, record: &crate::VideoRecord) -> anyhow::Result<()> {
        // The unique constraint on video_link keeps the log duplicate-free
        // even if two writers race; the loser's insert is a no-op.
        sqlx::query(
            r#"
            INSERT INTO video_records (channel_id, video_link, upload_time, title, view_count, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (video_link) DO NOTHING
            "#,
        )
        .bind(&record.channel_id)
        .bind(&record.video_link)
        .bind(&record.upload_time)
        .bind(&record.title)
        .bind(&record.view_count)
        .bind(&record.tags)
        .execute(&self.pool)
        .await
        .inspect_err(|err| {
            tracing::error!(
                error = ?err,
                video_link = %record.video_link,
                "Failed to append video record"
            )
        })
        .context("Failed to append video record")?;

        Ok(())
    }

    async fn read_channel_list(&self) -> anyhow::Result<Vec<String>> {
        #[derive(sqlx::FromRow)]
        struct ChannelId {
            channel_id: String,
        }

        let channels =
            sqlx::query_as::<_, ChannelId>("SELECT channel_id FROM channels ORDER BY id ASC")
                .fetch_all(&self.pool)
                .await
                .inspect_err(|e| {
                    tracing::error!(error = ?e, "Failed to read channel list");
                })
                .context("Failed to read channel list")?;

        Ok(channels.into_iter().map(|c| c.channel_id).collect())
    }
}
