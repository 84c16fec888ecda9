use chrono::{Local, TimeZone};
use serde_json::Value;

use super::types::{
    Holding, PortfolioSnapshot, RankingEntry, RankingValue, RawCurrentRebalancing, RawHolding,
    RawRebalancingHistory, RebalancingRecord, TradeAction,
};
use crate::error::FetchError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const NOT_AVAILABLE: &str = "N/A";
pub const DEFAULT_NET_VALUE: f64 = 1.0;
const MILLIS_THRESHOLD: u64 = 1_000_000_000_000;

/// Formats an epoch value as local time. Values above 10^12 are taken as
/// milliseconds. Zero, absent or unrepresentable values give `"-"`.
pub fn format_timestamp(ts: Option<i64>) -> String {
    let Some(ts) = ts.filter(|t| *t != 0) else {
        return "-".to_string();
    };
    let secs = if ts.unsigned_abs() > MILLIS_THRESHOLD { ts.div_euclid(1000) } else { ts };
    match Local.timestamp_opt(secs, 0).single() {
        Some(dt) => dt.format(TIMESTAMP_FORMAT).to_string(),
        None => "-".to_string(),
    }
}

pub fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// `12.345` -> `"12.35%"`.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// Like [`percent`] but renders an absent value as `"-"`.
pub fn optional_percent(value: Option<f64>) -> String {
    value.map(percent).unwrap_or_else(|| "-".to_string())
}

/// Direction of a rebalancing step from its weight change. Absent weights
/// count as zero. This only looks at the sign of the weight delta, so it is
/// an approximation of what was traded, not a record of it.
pub fn infer_action(prev_weight: Option<f64>, target_weight: Option<f64>) -> TradeAction {
    if target_weight.unwrap_or(0.0) > prev_weight.unwrap_or(0.0) {
        TradeAction::Buy
    } else {
        TradeAction::Sell
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Ranking field rendered verbatim, `"N/A"` when absent or null.
pub fn ranking_text(value: Option<&Value>) -> String {
    present(value).map(value_text).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Ranking percentage field: `"<value>%"`, `"N/A"` when absent or null.
/// The sentinel deliberately carries no `%` suffix, so it compares equal to
/// the one [`ranking_text`] produces.
pub fn ranking_percent(value: Option<&Value>) -> String {
    present(value)
        .map(|v| format!("{}%", value_text(v)))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Ranking numeric field kept as a number when it is one.
pub fn ranking_value(value: Option<&Value>) -> RankingValue {
    match present(value) {
        Some(Value::Number(n)) => RankingValue::Number(n.clone()),
        Some(other) => RankingValue::Text(value_text(other)),
        None => RankingValue::not_available(),
    }
}

// -------------------- Holdings --------------------

/// `quote[code].net_value`, 1.0 when absent or not a number.
pub fn net_value(quote: &Value, portfolio_code: &str) -> f64 {
    quote
        .get(portfolio_code)
        .and_then(|q| q.get("net_value"))
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_NET_VALUE)
}

fn holding(raw: RawHolding) -> Holding {
    Holding {
        stock_code: raw.stock_symbol.unwrap_or_default(),
        stock_name: raw.stock_name.unwrap_or_default(),
        weight: percent(raw.weight.unwrap_or(0.0)),
        target_weight: percent(raw.target_weight.unwrap_or(0.0)),
        sector: raw.segment_name.unwrap_or_default(),
        price: raw.price.unwrap_or(0.0),
    }
}

pub fn portfolio_snapshot(
    portfolio_code: &str,
    raw: RawCurrentRebalancing,
    net_value: f64,
    retrieved_at: String,
) -> PortfolioSnapshot {
    let last_rb = raw.last_rb.unwrap_or_default();
    let holdings: Vec<Holding> = last_rb.holdings.unwrap_or_default().into_iter().map(holding).collect();

    PortfolioSnapshot {
        code: portfolio_code.to_string(),
        name: raw.name.unwrap_or_default(),
        net_value,
        cash_ratio: percent(last_rb.cash.unwrap_or(0.0)),
        retrieved_at,
        holding_count: holdings.len(),
        holdings,
    }
}

// -------------------- Rebalancing history --------------------

/// One record per (event, stock) pair, events and stocks in response order.
pub fn rebalancing_records(raw: RawRebalancingHistory) -> Vec<RebalancingRecord> {
    let mut records = Vec::new();
    for event in raw.list.unwrap_or_default() {
        let status = event.status.unwrap_or_default();
        let created_at = format_timestamp(event.created_at);
        let updated_at = format_timestamp(event.updated_at);

        for entry in event.rebalancing_histories.unwrap_or_default() {
            records.push(RebalancingRecord {
                rebalancing_id: event.id,
                status: status.clone(),
                created_at: created_at.clone(),
                updated_at: updated_at.clone(),
                stock_code: entry.stock_symbol.unwrap_or_default(),
                stock_name: entry.stock_name.unwrap_or_default(),
                prev_weight: optional_percent(entry.prev_weight),
                target_weight: percent(entry.target_weight.unwrap_or(0.0)),
                weight: optional_percent(entry.weight),
                price: entry.price.unwrap_or(0.0),
                action: infer_action(entry.prev_weight, entry.target_weight),
            });
        }
    }
    records
}

// -------------------- Ranking --------------------

/// Epoch field that may be served as an integer or a float.
fn epoch(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| value.as_f64().map(|f| f as i64))
}

/// Ranks are the 1-based positions in `list`; no re-sorting happens.
pub fn ranking_entries(payload: &Value) -> Result<Vec<RankingEntry>, FetchError> {
    let list = payload
        .get("list")
        .and_then(Value::as_array)
        .ok_or(FetchError::MalformedResponse("list"))?;

    let entries = list
        .iter()
        .enumerate()
        .map(|(idx, cube)| RankingEntry {
            rank: idx + 1,
            code: ranking_text(cube.get("symbol")),
            name: ranking_text(cube.get("name")),
            annualized_return: ranking_percent(cube.get("annualized_gain_rate")),
            total_return: ranking_percent(cube.get("total_gain")),
            daily_return: ranking_percent(cube.get("daily_gain")),
            monthly_return: ranking_percent(cube.get("monthly_gain")),
            net_value: ranking_value(cube.get("net_value")),
            rank_percentile: ranking_percent(cube.get("rank_percent")),
            follower_count: ranking_value(cube.get("follower_count")),
            updated_at: format_timestamp(cube.get("updated_at").and_then(epoch)),
        })
        .collect();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn local(secs: i64) -> String {
        Local.timestamp_opt(secs, 0).unwrap().format(TIMESTAMP_FORMAT).to_string()
    }

    #[test]
    fn seconds_are_formatted_as_is() {
        assert_eq!(format_timestamp(Some(1_700_000_000)), local(1_700_000_000));
    }

    #[test]
    fn milliseconds_are_divided() {
        assert_eq!(format_timestamp(Some(1_700_000_000_000)), local(1_700_000_000));
        assert_eq!(format_timestamp(Some(1_700_000_000_999)), local(1_700_000_000));
    }

    #[test]
    fn zero_and_absent_render_dash() {
        assert_eq!(format_timestamp(Some(0)), "-");
        assert_eq!(format_timestamp(None), "-");
    }

    #[test]
    fn out_of_range_renders_dash() {
        assert_eq!(format_timestamp(Some(i64::MAX)), "-");
    }

    #[test]
    fn percent_rounds_to_two_places() {
        assert_eq!(percent(12.345), "12.35%");
        assert_eq!(percent(10.0), "10.00%");
        assert_eq!(optional_percent(None), "-");
        assert_eq!(optional_percent(Some(5.0)), "5.00%");
    }

    #[test]
    fn action_compares_target_with_previous() {
        assert_eq!(infer_action(Some(5.0), Some(8.0)), TradeAction::Buy);
        assert_eq!(infer_action(Some(8.0), Some(5.0)), TradeAction::Sell);
        assert_eq!(infer_action(None, Some(1.0)), TradeAction::Buy);
        assert_eq!(infer_action(Some(3.0), None), TradeAction::Sell);
        assert_eq!(infer_action(Some(4.0), Some(4.0)), TradeAction::Sell);
    }

    #[test]
    fn ranking_fields_default_to_not_available() {
        assert_eq!(ranking_text(None), "N/A");
        assert_eq!(ranking_percent(Some(&Value::Null)), "N/A");
        assert_eq!(ranking_value(None), RankingValue::Text("N/A".to_string()));
    }

    #[test]
    fn net_value_defaults_to_one() {
        assert_eq!(net_value(&json!({"ZH1": {"net_value": 1.2345}}), "ZH1"), 1.2345);
        assert_eq!(net_value(&json!({"ZH2": {"net_value": 2.0}}), "ZH1"), 1.0);
        assert_eq!(net_value(&json!({}), "ZH1"), 1.0);
    }

    #[test]
    fn snapshot_defaults_missing_fields() {
        let raw: RawCurrentRebalancing = serde_json::from_value(json!({
            "name": "稳健组合",
            "last_rb": {"cash": 3.5, "holdings": [{"stock_symbol": "SZ000001"}]}
        }))
        .unwrap();
        let snapshot = portfolio_snapshot("ZH1", raw, 1.0, "2024-01-01 00:00:00".to_string());
        assert_eq!(snapshot.name, "稳健组合");
        assert_eq!(snapshot.cash_ratio, "3.50%");
        assert_eq!(snapshot.holding_count, 1);
        let h = &snapshot.holdings[0];
        assert_eq!(h.stock_code, "SZ000001");
        assert_eq!(h.stock_name, "");
        assert_eq!(h.weight, "0.00%");
        assert_eq!(h.target_weight, "0.00%");
        assert_eq!(h.sector, "");
        assert_eq!(h.price, 0.0);
    }

    #[test]
    fn snapshot_without_last_rb_is_empty() {
        let snapshot = portfolio_snapshot("ZH1", RawCurrentRebalancing::default(), 1.0, String::new());
        assert_eq!(snapshot.holding_count, 0);
        assert!(snapshot.holdings.is_empty());
        assert_eq!(snapshot.cash_ratio, "0.00%");
    }

    #[test]
    fn history_is_flattened_per_stock() {
        let raw: RawRebalancingHistory = serde_json::from_value(json!({
            "list": [
                {"id": 7, "status": "success", "created_at": 1_700_000_000_000i64, "updated_at": 0,
                 "rebalancing_histories": [
                    {"stock_symbol": "A", "prev_weight": null, "target_weight": 10.0, "weight": 9.5, "price": 1.0},
                    {"stock_symbol": "B", "prev_weight": 20.0, "target_weight": 5.0, "price": 2.0}
                 ]},
                {"id": 8, "status": "canceled", "rebalancing_histories": []}
            ]
        }))
        .unwrap();
        let records = rebalancing_records(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].rebalancing_id, Some(7));
        assert_eq!(records[0].prev_weight, "-");
        assert_eq!(records[0].weight, "9.50%");
        assert_eq!(records[0].action, TradeAction::Buy);
        assert_eq!(records[0].created_at, local(1_700_000_000));
        assert_eq!(records[0].updated_at, "-");
        assert_eq!(records[1].stock_code, "B");
        assert_eq!(records[1].prev_weight, "20.00%");
        assert_eq!(records[1].weight, "-");
        assert_eq!(records[1].action, TradeAction::Sell);
    }

    #[test]
    fn history_without_list_is_empty() {
        assert!(rebalancing_records(RawRebalancingHistory::default()).is_empty());
    }

    #[test]
    fn ranking_requires_list() {
        let err = ranking_entries(&json!({"count": 0})).unwrap_err();
        assert!(matches!(err, FetchError::MalformedResponse("list")));

        for list in [json!(null), json!({"0": {}}), json!("[]")] {
            let err = ranking_entries(&json!({ "list": list })).unwrap_err();
            assert!(matches!(err, FetchError::MalformedResponse("list")));
        }
    }

    #[test]
    fn ranking_accepts_float_epochs() {
        let payload = json!({"list": [
            {"symbol": "ZH1", "updated_at": 1_700_000_000_000.0_f64},
            {"symbol": "ZH2", "updated_at": 1_700_000_000_000_i64}
        ]});
        let entries = ranking_entries(&payload).unwrap();
        assert_ne!(entries[0].updated_at, "-");
        assert_eq!(entries[0].updated_at, entries[1].updated_at);
        assert_eq!(entries[0].updated_at, format_timestamp(Some(1_700_000_000)));
    }

    #[test]
    fn ranking_uses_response_order() {
        let payload = json!({"list": [
            {"symbol": "ZH2", "name": "second best", "rank_percent": 0.5},
            {"symbol": "ZH1", "name": "best", "rank_percent": 0.1, "follower_count": 99}
        ]});
        let entries = ranking_entries(&payload).unwrap();
        assert_eq!(entries[0].rank, 1);
        assert_eq!(entries[0].code, "ZH2");
        assert_eq!(entries[0].follower_count, RankingValue::not_available());
        assert_eq!(entries[0].annualized_return, "N/A");
        assert_eq!(entries[0].updated_at, "-");
        assert_eq!(entries[1].rank, 2);
        assert_eq!(entries[1].rank_percentile, "0.1%");
        assert_eq!(entries[1].follower_count.as_f64(), Some(99.0));
    }

    #[test]
    fn ranking_fields_keep_upstream_text() {
        assert_eq!(ranking_percent(Some(&json!(35.2))), "35.2%");
        assert_eq!(ranking_percent(Some(&json!("12"))), "12%");
        assert_eq!(ranking_text(Some(&json!("ZH000001"))), "ZH000001");
        assert_eq!(ranking_value(Some(&json!(1024))), RankingValue::Number(1024.into()));
    }
}
