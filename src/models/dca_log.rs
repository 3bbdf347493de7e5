use super::Strategy;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One open, pending, or watch-only position. Four upstream sources merge
/// into this one shape; only the active-DCA source carries buy-strategy
/// detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DcaLogEntry {
    pub market: String,
    pub amount: f64,
    pub bought_times: i64,
    pub profit_percent: f64,
    pub average_buy_price: f64,
    pub total_cost: f64,
    pub current_price: f64,
    /// Always recomputed locally as `current_price * amount`, never trusted
    /// from upstream.
    pub current_value: f64,
    pub buy_trigger_percent: f64,
    pub current_low_bb_value: f64,
    pub current_high_bb_value: f64,
    pub bb_trigger: f64,
    pub sell_trigger: f64,
    pub perc_change: f64,
    pub leverage: f64,
    pub buy_strategy: String,
    pub sell_strategy: String,
    /// Smallest entry value among gain-named sell strategies, if any.
    pub target_gain_value: Option<f64>,
    /// Localized first-buy time; the sentinel minimum date when the position
    /// has no recorded buy.
    pub first_bought_date: NaiveDateTime,
    pub buy_strategies: Vec<Strategy>,
    pub sell_strategies: Vec<Strategy>,
}
