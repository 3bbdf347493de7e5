pub mod aggregates;
pub mod cache;
pub mod fetcher;
pub mod localtime;
pub mod monitor;
pub mod normalize;

pub use cache::CacheSlot;
pub use fetcher::BotApiClient;
pub use localtime::LocalClock;
pub use monitor::MonitorData;
