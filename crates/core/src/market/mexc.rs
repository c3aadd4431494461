use crate::config::Settings;
use crate::domain::market::{KlineInterval, PriceSeries, Ticker};
use crate::domain::symbol::Symbol;
use crate::market::provider::MarketDataClient;
use crate::market::types::{ContractDetail, ContractTicker, KlineData, MexcEnvelope};
use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

const DETAIL_PATH: &str = "/contract/detail";
const TICKER_PATH: &str = "/contract/ticker";
const KLINE_PATH: &str = "/contract/kline";

const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// MEXC futures (contract) REST client.
#[derive(Debug, Clone)]
pub struct MexcClient {
    http: reqwest::Client,
    base_url: String,
    interval: KlineInterval,
    max_attempts: u32,
    backoff: Duration,
}

impl MexcClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.mexc_base_url.clone(),
            settings.kline_interval,
            Duration::from_secs(settings.http_timeout_secs),
            settings.http_max_attempts(),
        )
    }

    pub fn new(
        base_url: String,
        interval: KlineInterval,
        timeout: Duration,
        max_attempts: u32,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build MEXC http client")?;

        Ok(Self {
            http,
            base_url,
            interval,
            max_attempts: max_attempts.max(1),
            backoff: DEFAULT_BACKOFF,
        })
    }

    /// First retry delay; later retries double it up to a fixed cap.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn url(&self, path: &str) -> String {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// GET with retries on transport errors, HTTP 429/5xx and unparseable bodies.
    async fn get_data<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let url = self.url(path);
        let mut attempt: u32 = 0;

        let envelope = loop {
            attempt += 1;

            let err = match self.http.get(&url).query(query).send().await {
                Err(err) => anyhow::Error::new(err).context(format!("MEXC {path} request failed")),
                Ok(res) => {
                    let status = res.status();
                    match res.text().await {
                        Err(err) => anyhow::Error::new(err)
                            .context(format!("failed to read MEXC {path} response")),
                        Ok(text) if !status.is_success() => {
                            let retryable =
                                status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                            if !retryable {
                                anyhow::bail!("MEXC {path} HTTP {status}: {text}");
                            }
                            anyhow::anyhow!("MEXC {path} HTTP {status}: {text}")
                        }
                        Ok(text) => match serde_json::from_str::<MexcEnvelope<T>>(&text) {
                            Ok(envelope) => break envelope,
                            Err(err) => anyhow::Error::new(err)
                                .context(format!("failed to parse MEXC {path} response")),
                        },
                    }
                }
            };

            if attempt >= self.max_attempts {
                return Err(err);
            }
            let backoff = retry_backoff(self.backoff, attempt);
            tracing::warn!(attempt, ?backoff, path, error = %err, "MEXC request failed; retrying");
            tokio::time::sleep(backoff).await;
        };

        if envelope.success == Some(false) {
            anyhow::bail!(
                "MEXC {path} rejected request (code={}): {}",
                envelope.code.unwrap_or_default(),
                envelope.message.unwrap_or_default()
            );
        }

        Ok(envelope.data)
    }
}

#[async_trait::async_trait]
impl MarketDataClient for MexcClient {
    fn provider_name(&self) -> &'static str {
        "mexc_contract"
    }

    async fn list_active_symbols(&self) -> Result<Vec<Symbol>> {
        let details = self
            .get_data::<Vec<ContractDetail>>(DETAIL_PATH, &[])
            .await?
            .context("contract detail response has no data")?;
        Ok(active_usdt_symbols(details))
    }

    async fn snapshot_prices(&self) -> Result<HashMap<Symbol, Ticker>> {
        let tickers = self
            .get_data::<Vec<ContractTicker>>(TICKER_PATH, &[])
            .await?
            .context("contract ticker response has no data")?;
        Ok(tickers_by_symbol(tickers))
    }

    async fn history(&self, symbol: &Symbol, min_len: usize) -> Result<PriceSeries> {
        let path = format!("{KLINE_PATH}/{symbol}");
        let query = kline_window(self.interval, min_len, chrono::Utc::now().timestamp());

        let data = self
            .get_data::<KlineData>(&path, &query)
            .await
            .with_context(|| format!("kline fetch failed for {symbol}"))?;

        let points = match data {
            Some(data) => data
                .into_points()
                .with_context(|| format!("malformed kline payload for {symbol}"))?,
            None => Vec::new(),
        };

        Ok(PriceSeries::from_points(points))
    }
}

/// Enabled `_USDT` contracts in listing order, first occurrence wins.
pub fn active_usdt_symbols(details: Vec<ContractDetail>) -> Vec<Symbol> {
    let mut seen = HashSet::new();
    details
        .into_iter()
        .filter(|d| d.state == Some(0))
        .map(|d| Symbol::new(d.symbol))
        .filter(|s| s.is_usdt_quoted())
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

pub fn tickers_by_symbol(tickers: Vec<ContractTicker>) -> HashMap<Symbol, Ticker> {
    tickers
        .into_iter()
        .map(|t| {
            (
                Symbol::new(t.symbol),
                Ticker::from_last_and_amount(t.last_price, t.amount24),
            )
        })
        .collect()
}

/// `base`, `2 * base`, `4 * base` ... capped at [`MAX_BACKOFF`].
fn retry_backoff(base: Duration, attempt: u32) -> Duration {
    let factor = 1u32
        .checked_shl(attempt.saturating_sub(1))
        .unwrap_or(u32::MAX);
    base.saturating_mul(factor).min(MAX_BACKOFF)
}

/// Query covering at least `min_len` closed intervals plus the one in progress.
fn kline_window(interval: KlineInterval, min_len: usize, now_secs: i64) -> Vec<(&'static str, String)> {
    let span = interval.seconds() * (min_len as i64 + 1);
    vec![
        ("interval", interval.as_api_str().to_string()),
        ("start", (now_secs - span).to_string()),
        ("end", now_secs.to_string()),
        ("limit", (min_len + 1).to_string()),
    ]
}
