use serde::{Deserialize, Serialize};
use std::fmt;

pub const QUOTE_DELIMITER: char = '_';
pub const USDT_SUFFIX: &str = "_USDT";

/// Exchange contract identifier, e.g. `OKB_USDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `OKB_USDT` -> `OKB`. Symbols without a delimiter display as-is.
    pub fn base_asset(&self) -> &str {
        self.0
            .split_once(QUOTE_DELIMITER)
            .map(|(base, _)| base)
            .unwrap_or(&self.0)
    }

    pub fn is_usdt_quoted(&self) -> bool {
        self.0.ends_with(USDT_SUFFIX)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
