use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Named lookback measured in sampling intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonSpec {
    pub name: String,
    pub offset: usize,
}

impl HorizonSpec {
    pub fn new(name: impl Into<String>, offset: usize) -> Self {
        Self {
            name: name.into(),
            offset,
        }
    }
}

/// 3, 7 and 20 days of hourly candles.
pub fn default_horizons() -> Vec<HorizonSpec> {
    vec![
        HorizonSpec::new("3D", 72),
        HorizonSpec::new("7D", 168),
        HorizonSpec::new("20D", 480),
    ]
}

/// Parses `NAME=OFFSET[,NAME=OFFSET...]`, keeping the configured order.
pub fn parse_horizons(s: &str) -> anyhow::Result<Vec<HorizonSpec>> {
    let mut out = Vec::new();
    let mut seen = BTreeSet::new();

    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let (name, offset) = part
            .split_once('=')
            .with_context(|| format!("horizon must look like NAME=OFFSET (got {part:?})"))?;
        let name = name.trim();
        anyhow::ensure!(!name.is_empty(), "horizon name must be non-empty");

        let offset = offset
            .trim()
            .parse::<usize>()
            .with_context(|| format!("invalid offset for horizon {name}"))?;
        anyhow::ensure!(offset >= 1, "horizon {name} offset must be >= 1");
        anyhow::ensure!(seen.insert(name.to_string()), "duplicate horizon: {name}");

        out.push(HorizonSpec::new(name, offset));
    }

    anyhow::ensure!(!out.is_empty(), "at least one horizon is required");
    Ok(out)
}

/// Number of points needed to cover the longest horizon.
pub fn required_history_len(horizons: &[HorizonSpec]) -> usize {
    horizons.iter().map(|h| h.offset).max().unwrap_or(0) + 1
}
