//! Upstream API paths and normalization markers.
//!
//! The bot exposes two known schema generations; the markers here drive the
//! fallback parsing in `services::normalize`.

use chrono::NaiveDateTime;

/// Page size used when paginating the sales endpoint. A page shorter than
/// this ends the pagination loop.
pub const SALES_PAGE_SIZE: usize = 5000;

/// Paths on the bot API, relative to the configured base URL. The token
/// query parameter is appended by the fetcher.
pub mod api_path {
    pub const MISC: &str = "api/v2/data/misc";
    pub const PROPERTIES: &str = "api/v2/data/properties";
    pub const SALES: &str = "api/v2/data/sales";
    pub const DCA: &str = "api/v2/data/dca";
    pub const PAIRS: &str = "api/v2/data/pairs";
    pub const PENDING: &str = "api/v2/data/pending";
    pub const WATCHMODE: &str = "api/v2/data/watchmode";
    pub const BUY_LOG: &str = "api/v2/data/pbl";
}

/// Case-insensitive substring markers used by the normalizer.
pub mod marker {
    /// Sell strategies whose name carries this marker feed the target-gain
    /// selection.
    pub const GAIN: &str = "gain";
    /// "Sell Only Mode" flag on buy strategies.
    pub const SOM: &str = "som enabled";
    /// Legacy `positive` text field markers on buy candidates.
    pub const TRAILING: &str = "trailing";
    pub const TRUE: &str = "true";
}

/// Sentinel for "never bought": a well-known minimum date, never null and
/// never epoch zero.
pub fn min_date() -> NaiveDateTime {
    chrono::NaiveDate::from_ymd_opt(1, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}
