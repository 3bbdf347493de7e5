use serde::{Deserialize, Serialize};

/// Instance configuration reported by the bot's properties endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    pub currency: String,
    pub shorting: bool,
    pub margin: bool,
    /// Uptime in milliseconds.
    pub up_time: i64,
    pub port: i64,
    pub is_leverage_exchange: bool,
    pub base_url: String,
}
