use std::fmt;
use serde::{Deserialize, Serialize};

// -------------------- Raw API payloads --------------------
// Every field is optional: the endpoints omit or null fields freely and the
// normalizers pick the defaults.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCurrentRebalancing {
    pub name: Option<String>,
    pub last_rb: Option<RawLastRebalancing>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLastRebalancing {
    pub cash: Option<f64>,
    pub holdings: Option<Vec<RawHolding>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawHolding {
    pub stock_symbol: Option<String>,
    pub stock_name: Option<String>,
    pub weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub segment_name: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRebalancingHistory {
    pub list: Option<Vec<RawRebalancingEvent>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRebalancingEvent {
    pub id: Option<i64>,
    pub status: Option<String>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub rebalancing_histories: Option<Vec<RawRebalancingEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRebalancingEntry {
    pub stock_symbol: Option<String>,
    pub stock_name: Option<String>,
    pub prev_weight: Option<f64>,
    pub target_weight: Option<f64>,
    pub weight: Option<f64>,
    pub price: Option<f64>,
}

// -------------------- Normalized results --------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub stock_code: String,
    pub stock_name: String,
    pub weight: String,        // e.g. "12.35%"
    pub target_weight: String, // e.g. "10.00%"
    pub sector: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    pub code: String,
    pub name: String,
    pub net_value: f64,
    pub cash_ratio: String,
    pub retrieved_at: String, // local time, YYYY-MM-DD HH:MM:SS
    pub holding_count: usize,
    pub holdings: Vec<Holding>,
}

/// Buy/sell guessed from the weight change of a rebalancing step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => f.write_str("buy"),
            TradeAction::Sell => f.write_str("sell"),
        }
    }
}

/// One stock inside one rebalancing event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancingRecord {
    pub rebalancing_id: Option<i64>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub stock_code: String,
    pub stock_name: String,
    pub prev_weight: String, // "-" when the stock was not held before
    pub target_weight: String,
    pub weight: String, // realized weight, "-" when absent
    pub price: f64,
    pub action: TradeAction,
}

/// A ranking field that is either the upstream number or a text value
/// (`"N/A"` when the field was missing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RankingValue {
    Number(serde_json::Number),
    Text(String),
}

impl RankingValue {
    pub fn not_available() -> Self {
        RankingValue::Text(super::normalize::NOT_AVAILABLE.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RankingValue::Number(n) => n.as_f64(),
            RankingValue::Text(_) => None,
        }
    }
}

impl fmt::Display for RankingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingValue::Number(n) => write!(f, "{}", n),
            RankingValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: usize, // position in the response, starting at 1
    pub code: String,
    pub name: String,
    pub annualized_return: String,
    pub total_return: String,
    pub daily_return: String,
    pub monthly_return: String,
    pub net_value: RankingValue,
    pub rank_percentile: String,
    pub follower_count: RankingValue,
    pub updated_at: String,
}
