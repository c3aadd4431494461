use crate::compute::leaderboard::{build_leaderboards, LeaderboardOptions};
use crate::delivery::DeliverySink;
use crate::domain::leaderboard::Report;
use crate::error::RunError;
use crate::market::provider::MarketDataClient;
use crate::render::ReportRenderer;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub universe: usize,
    pub retained: usize,
    pub scanned: usize,
    pub failures: usize,
    /// `(horizon, entries)` in configuration order.
    pub entries_per_horizon: Vec<(String, usize)>,
    pub report_chars: usize,
}

/// One full pass: universe, snapshot, changes, ranking, rendering, delivery.
pub async fn run_once(
    client: &dyn MarketDataClient,
    renderer: &dyn ReportRenderer,
    sink: &dyn DeliverySink,
    opts: &LeaderboardOptions,
    title: &str,
    now: DateTime<Utc>,
) -> Result<RunSummary, RunError> {
    let universe = client
        .list_active_symbols()
        .await
        .map_err(|err| RunError::universe("list_active_symbols", &err))?;

    let tickers = client
        .snapshot_prices()
        .await
        .map_err(|err| RunError::universe("snapshot_prices", &err))?;

    tracing::info!(
        symbols = universe.len(),
        tickers = tickers.len(),
        min_notional_usd = opts.min_notional_usd,
        "universe loaded"
    );

    let outcome = build_leaderboards(client, &universe, &tickers, opts).await;

    let report = Report {
        title: title.to_string(),
        generated_at: now,
        top_n: opts.top_n,
        sections: outcome.leaderboards,
    };
    let text = renderer.render(&report);

    let summary = RunSummary {
        universe: universe.len(),
        retained: outcome.retained,
        scanned: outcome.scanned,
        failures: outcome.failures,
        entries_per_horizon: report
            .sections
            .iter()
            .map(|s| (s.horizon.name.clone(), s.entries.len()))
            .collect(),
        report_chars: text.chars().count(),
    };

    sink.deliver(&text)
        .await
        .map_err(|err| RunError::delivery(sink.sink_name(), &err))?;

    tracing::info!(
        universe = summary.universe,
        retained = summary.retained,
        scanned = summary.scanned,
        failures = summary.failures,
        report_chars = summary.report_chars,
        layout = %renderer.layout(),
        sink = sink.sink_name(),
        "leaderboard delivered"
    );

    Ok(summary)
}
