mod buy_log;
mod dca_log;
mod properties;
mod sell_log;
mod strategy;
mod summary;
mod transaction;

pub use buy_log::BuyLogEntry;
pub use dca_log::DcaLogEntry;
pub use properties::Properties;
pub use sell_log::SellLogEntry;
pub use strategy::Strategy;
pub use summary::Summary;
pub use transaction::LedgerTransaction;
