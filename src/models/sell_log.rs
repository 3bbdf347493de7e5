use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One completed sale. The whole log is rebuilt wholesale on refresh, never
/// patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SellLogEntry {
    pub market: String,
    pub sold_amount: f64,
    pub bought_times: i64,
    /// Profit in percent of total cost.
    pub profit_percent: f64,
    /// Profit in the main currency.
    pub profit: f64,
    pub average_buy_price: f64,
    pub total_cost: f64,
    pub sold_price: f64,
    /// Sale time re-expressed at the configured UTC offset.
    pub sold_date: NaiveDateTime,
}
