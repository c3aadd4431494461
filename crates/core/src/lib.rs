pub mod compute;
pub mod delivery;
pub mod domain;
pub mod error;
pub mod market;
pub mod pipeline;
pub mod render;

pub mod config {
    use crate::compute::leaderboard::LeaderboardOptions;
    use crate::domain::horizon::{default_horizons, parse_horizons, HorizonSpec};
    use crate::domain::market::KlineInterval;
    use crate::render::{Layout, RenderOptions};
    use anyhow::Context;

    pub const DEFAULT_MEXC_BASE_URL: &str = "https://contract.mexc.com/api/v1";
    pub const DEFAULT_REPORT_TITLE: &str = "MEXC Derivatives - LIVE Rolling Changes";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub mexc_base_url: String,
        pub discord_webhook: Option<String>,
        pub sentry_dsn: Option<String>,

        /// Approximate USD notional traded in the last 24h. 0 disables the filter.
        pub min_usd_vol_24h: f64,
        pub max_scan_symbols: Option<usize>,
        pub horizons: Vec<HorizonSpec>,
        pub kline_interval: KlineInterval,
        pub top_n: usize,

        pub pct_decimals: usize,
        pub name_width: usize,
        pub pct_width: usize,
        pub mark_exclusive: bool,
        pub layout: Layout,
        pub report_title: String,

        pub fetch_concurrency: usize,
        pub progress_every: usize,
        pub http_timeout_secs: u64,
        /// Retries after the first attempt.
        pub http_retries: u32,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let horizons = match non_empty_var("HORIZONS") {
                Some(s) => parse_horizons(&s).context("invalid HORIZONS")?,
                None => default_horizons(),
            };

            let kline_interval = match non_empty_var("KLINE_INTERVAL") {
                Some(s) => s.parse::<KlineInterval>().context("invalid KLINE_INTERVAL")?,
                None => KlineInterval::Min60,
            };

            let layout = match non_empty_var("REPORT_LAYOUT") {
                Some(s) => s.parse::<Layout>().context("invalid REPORT_LAYOUT")?,
                None => Layout::Sections,
            };

            let pct_decimals = parse_var("PCT_DECIMALS").unwrap_or(0);
            anyhow::ensure!(
                pct_decimals <= 6,
                "PCT_DECIMALS must be 0..=6 (got {pct_decimals})"
            );

            Ok(Self {
                mexc_base_url: non_empty_var("MEXC_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_MEXC_BASE_URL.to_string()),
                discord_webhook: non_empty_var("DISCORD_WEBHOOK"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
                min_usd_vol_24h: parse_var("MIN_USD_VOL_24H").unwrap_or(50_000.0),
                max_scan_symbols: parse_var("MAX_SCAN_SYMBOLS"),
                horizons,
                kline_interval,
                top_n: parse_var("TOP_N").unwrap_or(20),
                pct_decimals,
                name_width: parse_var("NAME_WIDTH").unwrap_or(10),
                pct_width: parse_var("PCT_WIDTH").unwrap_or(6),
                mark_exclusive: parse_var("MARK_EXCLUSIVE").unwrap_or(true),
                layout,
                report_title: non_empty_var("REPORT_TITLE")
                    .unwrap_or_else(|| DEFAULT_REPORT_TITLE.to_string()),
                fetch_concurrency: parse_var("FETCH_CONCURRENCY").unwrap_or(4),
                progress_every: parse_var("PROGRESS_EVERY").unwrap_or(50),
                http_timeout_secs: parse_var("HTTP_TIMEOUT_SECS").unwrap_or(30),
                http_retries: parse_var("HTTP_RETRIES").unwrap_or(3),
            })
        }

        pub fn require_discord_webhook(&self) -> anyhow::Result<&str> {
            self.discord_webhook
                .as_deref()
                .context("DISCORD_WEBHOOK is required")
        }

        pub fn http_max_attempts(&self) -> u32 {
            self.http_retries.saturating_add(1)
        }

        pub fn leaderboard_options(&self) -> LeaderboardOptions {
            LeaderboardOptions {
                min_notional_usd: self.min_usd_vol_24h,
                max_scan: self.max_scan_symbols,
                horizons: self.horizons.clone(),
                top_n: self.top_n,
                concurrency: self.fetch_concurrency,
                progress_every: self.progress_every,
            }
        }

        pub fn render_options(&self) -> RenderOptions {
            RenderOptions {
                decimals: self.pct_decimals,
                name_width: self.name_width,
                pct_width: self.pct_width,
                mark_exclusive: self.mark_exclusive,
            }
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
        non_empty_var(key).and_then(|s| s.parse::<T>().ok())
    }

}
