use crate::compute::change::{compute_changes, is_usable_price};
use crate::domain::horizon::{default_horizons, required_history_len, HorizonSpec};
use crate::domain::leaderboard::{ChangeRecord, Leaderboard, LeaderboardEntry};
use crate::domain::market::Ticker;
use crate::domain::symbol::Symbol;
use crate::market::provider::MarketDataClient;
use futures::StreamExt;
use std::cmp::Ordering;
use std::collections::HashMap;

const MAX_LOGGED_FAILURES: usize = 10;

#[derive(Debug, Clone)]
pub struct LeaderboardOptions {
    /// Minimum 24h notional. Values <= 0 disable the liquidity screen.
    pub min_notional_usd: f64,

    /// Scan only the most liquid `max_scan` symbols.
    pub max_scan: Option<usize>,

    pub horizons: Vec<HorizonSpec>,
    pub top_n: usize,

    /// History requests in flight at once.
    pub concurrency: usize,

    /// Log progress every N symbols (0 disables).
    pub progress_every: usize,
}

impl Default for LeaderboardOptions {
    fn default() -> Self {
        Self {
            min_notional_usd: 50_000.0,
            max_scan: None,
            horizons: default_horizons(),
            top_n: 20,
            concurrency: 4,
            progress_every: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuildOutcome {
    /// One per configured horizon, in configuration order.
    pub leaderboards: Vec<Leaderboard>,
    pub retained: usize,
    pub scanned: usize,
    pub failures: usize,
}

pub async fn build_leaderboards(
    client: &dyn MarketDataClient,
    universe: &[Symbol],
    tickers: &HashMap<Symbol, Ticker>,
    opts: &LeaderboardOptions,
) -> BuildOutcome {
    let filtered = filter_by_liquidity(universe, tickers, opts.min_notional_usd);
    let retained = cap_universe(filtered, tickers, opts.max_scan);
    let need = required_history_len(&opts.horizons);

    // Symbols without a usable live price are dropped before any history is requested.
    let priced: Vec<(&Symbol, f64)> = retained
        .iter()
        .filter_map(|s| {
            let last = tickers.get(s).map(|t| t.last_price).unwrap_or(0.0);
            is_usable_price(last).then_some((s, last))
        })
        .collect();

    let total = priced.len();
    tracing::info!(
        universe = universe.len(),
        retained = retained.len(),
        priced = total,
        history_len = need,
        provider = client.provider_name(),
        "scanning symbols"
    );

    let mut records: Vec<ChangeRecord> = Vec::new();
    let mut failures: usize = 0;
    let mut logged_failures: usize = 0;
    let mut processed: usize = 0;

    // `buffered` yields in input order, so records keep symbol iteration order.
    let mut fetches = futures::stream::iter(priced.iter().map(|&(symbol, last)| async move {
        (symbol, last, client.history(symbol, need).await)
    }))
    .buffered(opts.concurrency.max(1));

    while let Some((symbol, last, res)) = fetches.next().await {
        processed += 1;

        match res {
            Ok(series) => records.extend(compute_changes(symbol, last, &series, &opts.horizons)),
            Err(err) => {
                failures += 1;
                if logged_failures < MAX_LOGGED_FAILURES {
                    tracing::warn!(
                        %symbol,
                        failure_count = failures,
                        error = %err,
                        "history fetch failed; skipping symbol"
                    );
                    logged_failures += 1;
                }
            }
        }

        if opts.progress_every != 0 && (processed % opts.progress_every == 0 || processed == total)
        {
            tracing::info!(
                processed,
                total,
                records = records.len(),
                failures,
                "leaderboard scan progress"
            );
        }
    }

    let leaderboards = opts
        .horizons
        .iter()
        .map(|h| rank_horizon(h, &records, opts.top_n))
        .collect();

    BuildOutcome {
        leaderboards,
        retained: retained.len(),
        scanned: total,
        failures,
    }
}

pub fn filter_by_liquidity(
    universe: &[Symbol],
    tickers: &HashMap<Symbol, Ticker>,
    min_notional: f64,
) -> Vec<Symbol> {
    if min_notional <= 0.0 {
        return universe.to_vec();
    }
    universe
        .iter()
        .filter(|s| notional_of(tickers, s) >= min_notional)
        .cloned()
        .collect()
}

/// Keeps the `max_scan` highest-notional symbols (ties by position), preserving input order.
pub fn cap_universe(
    symbols: Vec<Symbol>,
    tickers: &HashMap<Symbol, Ticker>,
    max_scan: Option<usize>,
) -> Vec<Symbol> {
    let Some(max) = max_scan else {
        return symbols;
    };
    if symbols.len() <= max {
        return symbols;
    }

    let mut ranked: Vec<(usize, f64)> = symbols
        .iter()
        .enumerate()
        .map(|(i, s)| (i, notional_of(tickers, s)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let mut keep: Vec<usize> = ranked.into_iter().take(max).map(|(i, _)| i).collect();
    keep.sort_unstable();

    let mut symbols: Vec<Option<Symbol>> = symbols.into_iter().map(Some).collect();
    keep.into_iter().filter_map(|i| symbols[i].take()).collect()
}

/// Best-first top-N for one horizon. Equal changes keep record order.
pub fn rank_horizon(horizon: &HorizonSpec, records: &[ChangeRecord], top_n: usize) -> Leaderboard {
    let mut entries: Vec<LeaderboardEntry> = records
        .iter()
        .filter(|r| r.horizon == horizon.name)
        .map(|r| LeaderboardEntry {
            name: r.symbol.base_asset().to_string(),
            pct: r.pct,
        })
        .collect();

    entries.sort_by(|a, b| b.pct.partial_cmp(&a.pct).unwrap_or(Ordering::Equal));
    entries.truncate(top_n);

    Leaderboard {
        horizon: horizon.clone(),
        entries,
    }
}

fn notional_of(tickers: &HashMap<Symbol, Ticker>, symbol: &Symbol) -> f64 {
    tickers
        .get(symbol)
        .map(|t| t.notional24)
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}
