//! Monitor configuration.
//!
//! Settings are supplied, not derived: the dashboard host owns where they
//! come from. `from_env` is the convenience used by the bundled CLI.

use crate::error::{Error, Result};

/// Settings for one monitored bot instance.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Base URL of the bot API, e.g. "http://localhost:8081/".
    pub base_url: String,
    /// API token appended to every call.
    pub api_token: String,
    /// Refresh cadence for summary, properties and the sell log.
    pub refresh_secs: i64,
    /// Refresh cadence for the position scan (dca/pairs/pending/watch).
    pub bag_refresh_secs: i64,
    /// Refresh cadence for the buy-candidate scan.
    pub buy_refresh_secs: i64,
    /// Fixed UTC offset for localized timestamps, e.g. "+02:00".
    pub timezone_offset: String,
    /// Configured starting balance for snapshot reconstruction.
    pub start_balance: f64,
    /// Cap on markets reported by the top-markets roll-up.
    pub max_top_markets: usize,
}

impl MonitorConfig {
    /// Build a config from `PTMON_*` environment variables. Only the base
    /// URL and token are required.
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("PTMON_BASE_URL")
            .map_err(|_| Error::ConfigInvalid("PTMON_BASE_URL is not set".to_string()))?;
        let api_token = std::env::var("PTMON_API_TOKEN")
            .map_err(|_| Error::ConfigInvalid("PTMON_API_TOKEN is not set".to_string()))?;

        Ok(Self {
            base_url,
            api_token,
            refresh_secs: env_or("PTMON_REFRESH_SECS", 30),
            bag_refresh_secs: env_or("PTMON_BAG_REFRESH_SECS", 60),
            buy_refresh_secs: env_or("PTMON_BUY_REFRESH_SECS", 300),
            timezone_offset: std::env::var("PTMON_TZ_OFFSET")
                .unwrap_or_else(|_| "+00:00".to_string()),
            start_balance: env_or("PTMON_START_BALANCE", 0.0),
            max_top_markets: env_or("PTMON_MAX_TOP_MARKETS", 10),
        })
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<T>().ok())
        .unwrap_or(default)
}
