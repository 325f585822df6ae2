use std::{str::FromStr, time::Duration};

use apalis::{
    layers::{retry::RetryPolicy, sentry::SentryLayer},
    prelude::*,
};
use apalis_cron::{CronStream, Tick};
use channel_datastore::PgDataStore;
use channel_pulse::{
    schedule::SystemClock, tracing::init_tracing_subscriber, ChannelPollerBuilder, DataApiClient,
};
use clap::{Parser, Subcommand};
use cron::Schedule;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "channel-pulse", about = "YouTube channel upload poller")]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// YouTube Data API v3 key
    #[arg(long, env = "YOUTUBE_API_KEY")]
    api_key: String,

    /// Minimum hours between re-checks of a channel with a known last upload
    #[arg(long, env = "CHANNEL_DELAY_HOURS", default_value = "12")]
    channel_delay: i64,

    /// Record short-form videos as well
    #[arg(long, env = "INCLUDE_SHORTS")]
    include_shorts: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single poll cycle and exit
    Run,
    /// Poll on a fixed interval until interrupted
    Watch {
        /// Seconds to wait between cycles
        #[arg(long, env = "POLL_INTERVAL_SECS", default_value = "300")]
        poll_interval: u64,
    },
    /// Start the cron scheduler
    Cron {
        /// Cron schedule expression
        #[arg(long, env = "CRON_SCHEDULE", default_value = "0 */5 * * * *")]
        schedule: String,
    },
}

#[derive(Clone)]
struct Config {
    db_url: String,
    api_key: String,
    channel_delay: chrono::Duration,
    include_shorts: bool,
}

async fn build_poller(
    config: &Config,
) -> anyhow::Result<
    channel_pulse::ChannelPoller<PgDataStore, DataApiClient, SystemClock>,
> {
    let store = PgDataStore::init(&config.db_url).await?;
    let provider = DataApiClient::new(&config.api_key)?.with_shorts(config.include_shorts);

    let poller = ChannelPollerBuilder::new()
        .store(store)
        .provider(provider)
        .clock(SystemClock)
        .channel_delay(config.channel_delay)
        .build();

    Ok(poller)
}

async fn run_cycle_once(config: &Config) -> anyhow::Result<()> {
    let mut poller = build_poller(config).await?;
    poller.rebuild().await?;
    let report = poller.run_cycle().await?;
    tracing::info!(new_records = report.new_records, "Cycle finished");
    Ok(())
}

async fn handle_tick(_tick: Tick, config: Data<Config>) -> anyhow::Result<()> {
    tracing::info!("Running scheduled poll cycle...");
    run_cycle_once(&config).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let config = Config {
        db_url: cli.database_url,
        api_key: cli.api_key,
        channel_delay: chrono::Duration::hours(cli.channel_delay),
        include_shorts: cli.include_shorts,
    };

    match cli.command {
        Command::Run => {
            tracing::info!("Running a single poll cycle...");
            run_cycle_once(&config).await?;
        }
        Command::Watch { poll_interval } => {
            tracing::info!(poll_interval, "Starting poll loop...");
            let poller = build_poller(&config).await?;

            let token = CancellationToken::new();
            let shutdown = token.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    shutdown.cancel();
                }
            });

            poller
                .run_until_cancelled(Duration::from_secs(poll_interval), token)
                .await?;
        }
        Command::Cron { schedule } => {
            tracing::info!(%schedule, "Starting cron scheduler...");
            let schedule = Schedule::from_str(&schedule)?;

            let worker = WorkerBuilder::new("channel-pulse-cron")
                .backend(CronStream::new(schedule))
                .retry(RetryPolicy::retries(3))
                .layer(SentryLayer::new())
                .data(config)
                .build(handle_tick);

            worker.run().await?;
        }
    }

    Ok(())
}
