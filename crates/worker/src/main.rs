use clap::Parser;
use movers_core::delivery::discord::DiscordWebhookSink;
use movers_core::delivery::{DeliverySink, StdoutSink};
use movers_core::market::mexc::MexcClient;
use movers_core::render::{renderer_for, Layout, ReportRenderer};
use std::future::Future;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "movers_worker")]
struct Args {
    /// Render the leaderboard and print it instead of posting to the webhook.
    #[arg(long)]
    dry_run: bool,

    /// Report layout (sections | columns). Overrides REPORT_LAYOUT.
    #[arg(long)]
    layout: Option<Layout>,

    /// Keep running and publish every N minutes instead of exiting after one pass.
    #[arg(long)]
    every_mins: Option<u64>,
}

struct Runner {
    client: MexcClient,
    renderer: Box<dyn ReportRenderer>,
    sink: Box<dyn DeliverySink>,
    settings: movers_core::config::Settings,
}

impl Runner {
    async fn run(&self) -> anyhow::Result<()> {
        let summary = movers_core::pipeline::run_once(
            &self.client,
            self.renderer.as_ref(),
            self.sink.as_ref(),
            &self.settings.leaderboard_options(),
            &self.settings.report_title,
            chrono::Utc::now(),
        )
        .await?;

        for (horizon, entries) in &summary.entries_per_horizon {
            tracing::debug!(%horizon, entries, "horizon ranked");
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = movers_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let layout = args.layout.unwrap_or(settings.layout);
    let renderer = renderer_for(layout, settings.render_options());
    let sink: Box<dyn DeliverySink> = if args.dry_run {
        Box::new(StdoutSink)
    } else {
        Box::new(DiscordWebhookSink::from_settings(&settings)?)
    };
    let client = MexcClient::from_settings(&settings)?;

    tracing::info!(
        %layout,
        dry_run = args.dry_run,
        horizons = settings.horizons.len(),
        interval = %settings.kline_interval,
        top_n = settings.top_n,
        "movers worker starting"
    );

    let runner = Runner {
        client,
        renderer,
        sink,
        settings,
    };

    let Some(every_mins) = args.every_mins else {
        return runner.run().await.inspect_err(|err| {
            sentry_anyhow::capture_anyhow(err);
            tracing::error!(error = %err, "leaderboard run failed");
        });
    };

    anyhow::ensure!(every_mins >= 1, "--every-mins must be >= 1");
    run_every(
        Duration::from_secs(every_mins * 60),
        shutdown_signal(),
        || runner.run(),
    )
    .await;
    Ok(())
}

/// Runs `pass` on every tick until `shutdown` resolves, including mid-pass.
async fn run_every<F, Fut>(period: Duration, shutdown: impl Future<Output = ()>, mut pass: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        tokio::select! {
            res = pass() => {
                // A failed pass is reported and the next one still runs.
                if let Err(err) = res {
                    sentry_anyhow::capture_anyhow(&err);
                    tracing::error!(error = %err, "leaderboard run failed");
                }
            }
            _ = &mut shutdown => {
                tracing::warn!("shutdown requested during a run; abandoning it");
                break;
            }
        }
    }

    tracing::info!("shutdown signal received");
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}

fn init_sentry(settings: &movers_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
