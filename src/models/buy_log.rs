use super::Strategy;
use serde::{Deserialize, Serialize};

/// One buy-candidate scan result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuyLogEntry {
    pub market: String,
    pub profit_percent: f64,
    pub current_price: f64,
    pub perc_change: f64,
    pub volume_24h: f64,
    /// Aggregate over the strategies (or parsed from the legacy `positive`
    /// text field when no strategy data is present).
    pub is_trailing: bool,
    pub is_true: bool,
    /// Sell-only-mode flag derived from strategy names.
    pub is_som: bool,
    pub true_strategy_count: usize,
    pub buy_strategies: Vec<Strategy>,
}
