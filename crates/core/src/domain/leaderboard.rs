use crate::domain::horizon::HorizonSpec;
use crate::domain::symbol::Symbol;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub symbol: Symbol,
    pub horizon: String,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Base asset only, e.g. `OKB`.
    pub name: String,
    pub pct: f64,
}

/// Top-N entries for one horizon, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub horizon: HorizonSpec,
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn empty(horizon: HorizonSpec) -> Self {
        Self {
            horizon,
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub top_n: usize,
    pub sections: Vec<Leaderboard>,
}
