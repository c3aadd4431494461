use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Live snapshot used for pricing and liquidity screening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub last_price: f64,
    /// `last_price * amount24`, an approximate 24h USD notional.
    pub notional24: f64,
}

impl Ticker {
    pub fn from_last_and_amount(last_price: f64, amount24: f64) -> Self {
        Self {
            last_price,
            notional24: last_price * amount24,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Interval open time, epoch seconds.
    pub timestamp: i64,
    pub close: f64,
    pub volume: Option<f64>,
}

/// Close series ordered strictly ascending by timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries(Vec<PricePoint>);

impl PriceSeries {
    /// Sorts by timestamp; for duplicate timestamps the last point received wins.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.timestamp);

        let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
        for p in points {
            match out.last_mut() {
                Some(prev) if prev.timestamp == p.timestamp => *prev = p,
                _ => out.push(p),
            }
        }
        Self(out)
    }

    pub fn from_closes(closes: &[f64]) -> Self {
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                timestamp: i as i64,
                close,
                volume: None,
            })
            .collect();
        Self(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.0
    }

    /// Close `offset` intervals before the latest point; `None` when history is too short.
    pub fn close_back(&self, offset: usize) -> Option<f64> {
        let idx = self.0.len().checked_sub(offset + 1)?;
        Some(self.0[idx].close)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KlineInterval {
    Min60,
    Day1,
}

impl KlineInterval {
    pub fn as_api_str(self) -> &'static str {
        match self {
            KlineInterval::Min60 => "Min60",
            KlineInterval::Day1 => "Day1",
        }
    }

    pub fn seconds(self) -> i64 {
        match self {
            KlineInterval::Min60 => 3_600,
            KlineInterval::Day1 => 86_400,
        }
    }
}

impl fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

impl FromStr for KlineInterval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min60" | "1h" | "hour" => Ok(KlineInterval::Min60),
            "day1" | "1d" | "day" => Ok(KlineInterval::Day1),
            other => anyhow::bail!("unsupported kline interval: {other}"),
        }
    }
}
