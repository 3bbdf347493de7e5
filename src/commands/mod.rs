pub mod bags;
pub mod buys;
pub mod sales;
pub mod status;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::services::MonitorData;

/// Build a monitor from the environment; the commands share this setup.
fn monitor_from_env() -> Result<MonitorData> {
    MonitorData::new(MonitorConfig::from_env()?)
}

fn exit_with(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", e);
    std::process::exit(1);
}
