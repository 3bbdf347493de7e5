//! Version-tolerant normalization of upstream JSON.
//!
//! The bot API has two known schema generations: strategy lists arrive
//! either as a plain array ("buyStrategies") or wrapped under a "data" key
//! ("buyStrategiesData.data"). Each strategy-list field is probed in that
//! order; an entirely absent field means "no strategies", not an error.
//! Numeric fields that may be upstream-null default to zero, strings to
//! empty. Only the market id is required on every record.

use crate::constants::marker;
use crate::error::{Error, Result};
use crate::models::{BuyLogEntry, DcaLogEntry, Properties, SellLogEntry, Strategy, Summary};
use crate::services::localtime::LocalClock;
use serde_json::Value;

/// Decode the misc-endpoint payload.
pub fn summary(raw: &Value) -> Result<Summary> {
    Ok(Summary {
        market: required_str(raw, "market", "summary")?,
        balance: f64_or_zero(raw, "realBalance"),
        pairs_value: f64_or_zero(raw, "totalPairsCurrentValue"),
        dca_value: f64_or_zero(raw, "totalDCACurrentValue"),
        pending_value: f64_or_zero(raw, "totalPendingCurrentValue"),
        dust_value: f64_or_zero(raw, "totalDustCurrentValue"),
    })
}

/// Decode the properties-endpoint payload.
pub fn properties(raw: &Value) -> Result<Properties> {
    Ok(Properties {
        currency: required_str(raw, "currency", "properties")?,
        shorting: bool_or_false(raw, "shorting"),
        margin: bool_or_false(raw, "margin"),
        up_time: i64_or_zero(raw, "upTime"),
        port: i64_or_zero(raw, "port"),
        is_leverage_exchange: bool_or_false(raw, "isLeverageExchange"),
        base_url: str_or_empty(raw, "baseUrl"),
    })
}

/// Decode one page of the paginated sales endpoint (rows live under "data").
pub fn sell_log_page(page: &Value, clock: &LocalClock) -> Result<Vec<SellLogEntry>> {
    let rows = page
        .get("data")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::UpstreamMalformed("sales page has no 'data' array".to_string())
        })?;

    rows.iter().map(|row| sell_log_entry(row, clock)).collect()
}

fn sell_log_entry(row: &Value, clock: &LocalClock) -> Result<SellLogEntry> {
    Ok(SellLogEntry {
        market: required_str(row, "market", "sale")?,
        sold_amount: f64_or_zero(row, "soldAmount"),
        bought_times: i64_or_zero(row, "boughtTimes"),
        profit_percent: f64_or_zero(row, "profit"),
        profit: f64_or_zero(row, "profitCurrency"),
        average_buy_price: f64_or_zero(row, "avgPrice"),
        total_cost: f64_or_zero(row, "totalCost"),
        sold_price: f64_or_zero(row, "currentPrice"),
        // Sales are recorded in UTC upstream; project once, never twice.
        sold_date: clock.project(i64_or_zero(row, "soldDate")),
    })
}

/// Decode one buy-candidate row.
pub fn buy_log_entry(row: &Value) -> Result<BuyLogEntry> {
    let mut entry = BuyLogEntry {
        market: required_str(row, "market", "buy candidate")?,
        profit_percent: f64_or_zero(row, "profit"),
        current_price: f64_or_zero(row, "currentPrice"),
        perc_change: f64_or_zero(row, "percChange"),
        volume_24h: f64_or_zero(row, "volume"),
        is_trailing: false,
        is_true: false,
        is_som: false,
        true_strategy_count: 0,
        buy_strategies: Vec::new(),
    };

    if let Some(positive) = row.get("positive").and_then(Value::as_str) {
        // Legacy text flag, used only when no structured strategies exist.
        let lowered = positive.to_lowercase();
        entry.is_trailing = lowered.contains(marker::TRAILING);
        entry.is_true = lowered.contains(marker::TRUE);
    } else {
        entry.buy_strategies = strategy_list(row, "buyStrategies", "buyStrategiesData");
        for strat in &entry.buy_strategies {
            entry.is_som = entry.is_som || contains_ignore_case(&strat.name, marker::SOM);
            entry.is_trailing = entry.is_trailing || strat.is_trailing;
            entry.is_true = entry.is_true || strat.is_true;
            if strat.is_true {
                entry.true_strategy_count += 1;
            }
        }
    }

    Ok(entry)
}

/// Decode one position row from any of the four position sources. Only the
/// active-DCA source carries buy-strategy detail.
pub fn dca_log_entry(
    row: &Value,
    process_buy_strategies: bool,
    clock: &LocalClock,
) -> Result<DcaLogEntry> {
    let amount = f64_or_zero(row, "totalAmount");
    let current_price = f64_or_zero(row, "currentPrice");

    let buy_strategies = if process_buy_strategies {
        strategy_list(row, "buyStrategies", "buyStrategiesData")
    } else {
        Vec::new()
    };
    let sell_strategies = strategy_list(row, "sellStrategies", "sellStrategiesData");

    // Target gain: the smallest entry value among gain-named sell strategies.
    let target_gain_value = sell_strategies
        .iter()
        .filter(|s| contains_ignore_case(&s.name, marker::GAIN))
        .map(|s| s.entry_value)
        .fold(None, |best: Option<f64>, entry| match best {
            Some(current) if current <= entry => Some(current),
            _ => Some(entry),
        });

    Ok(DcaLogEntry {
        market: required_str(row, "market", "position")?,
        amount,
        bought_times: i64_or_zero(row, "boughtTimes"),
        profit_percent: f64_or_zero(row, "profit"),
        average_buy_price: f64_or_zero(row, "avgPrice"),
        total_cost: f64_or_zero(row, "totalCost"),
        current_price,
        // Recomputed locally so the value stays consistent even when
        // upstream omits it.
        current_value: current_price * amount,
        buy_trigger_percent: f64_or_zero(row, "buyProfit"),
        current_low_bb_value: f64_or_zero(row, "bbLow"),
        current_high_bb_value: f64_or_zero(row, "highBb"),
        bb_trigger: f64_or_zero(row, "bbTrigger"),
        sell_trigger: f64_or_zero(row, "triggerValue"),
        perc_change: f64_or_zero(row, "percChange"),
        leverage: f64_or_zero(row, "leverage"),
        buy_strategy: str_or_empty(row, "buyStrategy"),
        sell_strategy: str_or_empty(row, "sellStrategy"),
        target_gain_value,
        first_bought_date: clock.project(i64_or_zero(row, "firstBoughtDate")),
        buy_strategies,
        sell_strategies,
    })
}

/// Probe a strategy-list field in schema-generation order: the modern plain
/// array first, then the legacy wrapper's "data" key. Absent means empty.
fn strategy_list(row: &Value, modern_key: &str, legacy_key: &str) -> Vec<Strategy> {
    let rows = row
        .get(modern_key)
        .and_then(Value::as_array)
        .or_else(|| {
            row.get(legacy_key)
                .and_then(|wrapper| wrapper.get("data"))
                .and_then(Value::as_array)
        });

    match rows {
        Some(rows) => rows.iter().map(strategy).collect(),
        None => Vec::new(),
    }
}

fn strategy(raw: &Value) -> Strategy {
    Strategy {
        strategy_type: str_or_empty(raw, "type"),
        name: str_or_empty(raw, "name"),
        entry_value: f64_or_zero(raw, "entryValue"),
        entry_value_limit: raw.get("entryValueLimit").and_then(Value::as_f64),
        trigger_value: f64_or_zero(raw, "triggerValue"),
        current_value: f64_or_zero(raw, "currentValue"),
        current_value_percentage: f64_or_zero(raw, "currentValuePercentage"),
        decimals: i64_or_zero(raw, "decimals"),
        is_trailing: bool_or_false(raw, "trailing"),
        is_true: bool_or_false(raw, "strategyResult"),
    }
}

fn required_str(value: &Value, key: &str, record: &str) -> Result<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::UpstreamMalformed(format!("{} record is missing '{}'", record, key))
        })
}

fn str_or_empty(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn f64_or_zero(value: &Value, key: &str) -> f64 {
    value.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn i64_or_zero(value: &Value, key: &str) -> i64 {
    value
        .get(key)
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
        .unwrap_or(0)
}

fn bool_or_false(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::min_date;
    use serde_json::json;

    fn clock() -> LocalClock {
        LocalClock::parse("+02:00").unwrap()
    }

    #[test]
    fn test_summary_defaults_missing_numerics() {
        let raw = json!({ "market": "BTC", "realBalance": 1.25 });
        let summary = summary(&raw).unwrap();

        assert_eq!(summary.market, "BTC");
        assert_eq!(summary.balance, 1.25);
        assert_eq!(summary.dust_value, 0.0);
    }

    #[test]
    fn test_summary_requires_market() {
        assert!(summary(&json!({ "realBalance": 1.0 })).is_err());
    }

    #[test]
    fn test_sell_page_localizes_sold_date() {
        // 2024-01-01T00:00:00Z
        let page = json!({
            "data": [{
                "market": "ETHBTC",
                "soldAmount": 2.0,
                "profitCurrency": 0.01,
                "soldDate": 1_704_067_200i64
            }]
        });

        let entries = sell_log_page(&page, &clock()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries[0].sold_date.to_string(),
            "2024-01-01 02:00:00"
        );
    }

    #[test]
    fn test_sell_page_without_data_key_is_malformed() {
        assert!(sell_log_page(&json!({ "rows": [] }), &clock()).is_err());
    }

    fn strategy_row(name: &str, entry_value: f64, result: bool) -> serde_json::Value {
        json!({
            "type": "GAIN",
            "name": name,
            "entryValue": entry_value,
            "triggerValue": 1.0,
            "currentValue": 0.4,
            "currentValuePercentage": 40.0,
            "decimals": 2,
            "trailing": false,
            "strategyResult": result
        })
    }

    #[test]
    fn test_legacy_wrapper_shape_matches_modern_shape() {
        let modern = json!({
            "market": "ADABTC",
            "totalAmount": 10.0,
            "currentPrice": 0.5,
            "firstBoughtDate": 1_704_067_200i64,
            "sellStrategies": [strategy_row("Gain", 2.0, true)]
        });
        let legacy = json!({
            "market": "ADABTC",
            "totalAmount": 10.0,
            "currentPrice": 0.5,
            "firstBoughtDate": 1_704_067_200i64,
            "sellStrategiesData": { "data": [strategy_row("Gain", 2.0, true)] }
        });

        let from_modern = dca_log_entry(&modern, false, &clock()).unwrap();
        let from_legacy = dca_log_entry(&legacy, false, &clock()).unwrap();
        assert_eq!(from_modern.sell_strategies, from_legacy.sell_strategies);
        assert_eq!(from_modern, from_legacy);
    }

    #[test]
    fn test_absent_strategy_field_means_no_strategies() {
        let row = json!({
            "market": "ADABTC",
            "totalAmount": 1.0,
            "currentPrice": 0.5,
            "firstBoughtDate": 0
        });

        let entry = dca_log_entry(&row, true, &clock()).unwrap();
        assert!(entry.buy_strategies.is_empty());
        assert!(entry.sell_strategies.is_empty());
        assert_eq!(entry.target_gain_value, None);
    }

    #[test]
    fn test_target_gain_picks_smallest_gain_entry() {
        let row = json!({
            "market": "ADABTC",
            "totalAmount": 1.0,
            "currentPrice": 0.5,
            "firstBoughtDate": 0,
            "sellStrategies": [
                strategy_row("Gain A", 3.0, false),
                strategy_row("GAIN B", 1.5, false),
                strategy_row("Stoploss", 5.0, false),
            ]
        });

        let entry = dca_log_entry(&row, false, &clock()).unwrap();
        assert_eq!(entry.target_gain_value, Some(1.5));
    }

    #[test]
    fn test_current_value_is_recomputed_locally() {
        let row = json!({
            "market": "ADABTC",
            "totalAmount": 4.0,
            "currentPrice": 0.25,
            "currentValue": 999.0,
            "firstBoughtDate": 0
        });

        let entry = dca_log_entry(&row, false, &clock()).unwrap();
        assert_eq!(entry.current_value, 1.0);
    }

    #[test]
    fn test_never_bought_position_uses_sentinel_date() {
        let row = json!({
            "market": "ADABTC",
            "totalAmount": 1.0,
            "currentPrice": 0.5,
            "firstBoughtDate": 0
        });

        let entry = dca_log_entry(&row, false, &clock()).unwrap();
        assert_eq!(entry.first_bought_date, min_date());
    }

    #[test]
    fn test_null_numerics_default_to_zero() {
        let row = json!({
            "market": "ADABTC",
            "totalAmount": 1.0,
            "currentPrice": 0.5,
            "bbLow": null,
            "highBb": null,
            "triggerValue": null,
            "leverage": null,
            "buyStrategy": null,
            "firstBoughtDate": 0
        });

        let entry = dca_log_entry(&row, false, &clock()).unwrap();
        assert_eq!(entry.current_low_bb_value, 0.0);
        assert_eq!(entry.current_high_bb_value, 0.0);
        assert_eq!(entry.sell_trigger, 0.0);
        assert_eq!(entry.leverage, 0.0);
        assert_eq!(entry.buy_strategy, "");
    }

    #[test]
    fn test_buy_candidate_legacy_positive_flag() {
        let row = json!({
            "market": "XLMBTC",
            "profit": -1.0,
            "positive": "Trailing buy at 0.5, TRUE"
        });

        let entry = buy_log_entry(&row).unwrap();
        assert!(entry.is_trailing);
        assert!(entry.is_true);
        assert!(entry.buy_strategies.is_empty());
    }

    #[test]
    fn test_buy_candidate_aggregates_strategies() {
        let row = json!({
            "market": "XLMBTC",
            "buyStrategies": [
                strategy_row("SOM enabled", 1.0, false),
                strategy_row("Lowbb", 2.0, true),
                strategy_row("Anderson", 3.0, true),
            ]
        });

        let entry = buy_log_entry(&row).unwrap();
        assert!(entry.is_som);
        assert!(entry.is_true);
        assert!(!entry.is_trailing);
        assert_eq!(entry.true_strategy_count, 2);
        assert_eq!(entry.buy_strategies.len(), 3);
    }
}
