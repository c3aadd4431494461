use crate::domain::market::{PriceSeries, Ticker};
use crate::domain::symbol::Symbol;
use anyhow::Result;
use std::collections::HashMap;

/// Read side of the exchange. Implementations own timeouts and retries: every call either
/// returns data or fails after a bounded number of attempts.
#[async_trait::async_trait]
pub trait MarketDataClient: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Enabled, USDT-quoted contracts in exchange listing order, without duplicates.
    async fn list_active_symbols(&self) -> Result<Vec<Symbol>>;

    async fn snapshot_prices(&self) -> Result<HashMap<Symbol, Ticker>>;

    /// Ascending close history. May hold fewer than `min_len` points.
    async fn history(&self, symbol: &Symbol, min_len: usize) -> Result<PriceSeries>;
}
