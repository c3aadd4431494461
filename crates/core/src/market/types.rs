use crate::domain::market::PricePoint;
use anyhow::Context;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Common `{success, code, data}` wrapper of the contract API.
#[derive(Debug, Clone, Deserialize)]
pub struct MexcEnvelope<T> {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractDetail {
    pub symbol: String,
    /// 0 = enabled.
    #[serde(default)]
    pub state: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContractTicker {
    pub symbol: String,
    #[serde(rename = "lastPrice", default, deserialize_with = "lenient_f64")]
    pub last_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount24: f64,
}

/// Kline `data` arrives either row-oriented (`[[t, o, h, l, c, v], ...]`) or
/// column-oriented (`{"time": [...], "close": [...], "vol": [...]}`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum KlineData {
    Rows(Vec<Vec<Value>>),
    Columns(KlineColumns),
}

#[derive(Debug, Clone, Deserialize)]
pub struct KlineColumns {
    pub time: Vec<Value>,
    pub close: Vec<Value>,
    #[serde(default)]
    pub vol: Vec<Value>,
}

impl KlineData {
    /// Rows shorter than five fields are ignored; non-numeric time or close is an error.
    pub fn into_points(self) -> anyhow::Result<Vec<PricePoint>> {
        match self {
            KlineData::Rows(rows) => rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.len() >= 5)
                .map(|(i, row)| -> anyhow::Result<PricePoint> {
                    Ok(PricePoint {
                        timestamp: value_i64(&row[0])
                            .with_context(|| format!("kline row {i}: bad timestamp"))?,
                        close: value_f64(&row[4])
                            .with_context(|| format!("kline row {i}: bad close"))?,
                        volume: row.get(5).and_then(value_f64),
                    })
                })
                .collect(),
            KlineData::Columns(cols) => cols
                .time
                .iter()
                .zip(&cols.close)
                .enumerate()
                .map(|(i, (t, c))| -> anyhow::Result<PricePoint> {
                    Ok(PricePoint {
                        timestamp: value_i64(t)
                            .with_context(|| format!("kline column {i}: bad timestamp"))?,
                        close: value_f64(c)
                            .with_context(|| format!("kline column {i}: bad close"))?,
                        volume: cols.vol.get(i).and_then(value_f64),
                    })
                })
                .collect(),
        }
    }
}

/// Numbers or numeric strings. Null, missing and garbage read as 0.
fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<Value>::deserialize(deserializer)?;
    Ok(v.as_ref().and_then(value_f64).unwrap_or(0.0))
}

pub fn value_f64(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|x| x.is_finite())
}

pub fn value_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
