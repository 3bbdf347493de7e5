use serde::{Deserialize, Serialize};

/// Account snapshot reported by the bot's misc endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub market: String,
    /// Free balance on the exchange.
    pub balance: f64,
    pub pairs_value: f64,
    pub dca_value: f64,
    pub pending_value: f64,
    pub dust_value: f64,
}
