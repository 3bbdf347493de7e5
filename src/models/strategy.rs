use serde::{Deserialize, Serialize};

/// One evaluated buy or sell rule instance, embedded in buy candidates and
/// positions. No independent lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub strategy_type: String,
    pub name: String,
    pub entry_value: f64,
    pub entry_value_limit: Option<f64>,
    pub trigger_value: f64,
    pub current_value: f64,
    pub current_value_percentage: f64,
    pub decimals: i64,
    pub is_trailing: bool,
    pub is_true: bool,
}
