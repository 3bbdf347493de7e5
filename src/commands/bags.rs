use super::{exit_with, monitor_from_env};
use crate::constants::min_date;

pub async fn run() {
    let monitor = match monitor_from_env() {
        Ok(monitor) => monitor,
        Err(e) => exit_with(e),
    };

    if let Err(e) = show_bags(&monitor).await {
        exit_with(e);
    }
}

async fn show_bags(monitor: &crate::services::MonitorData) -> crate::error::Result<()> {
    let positions = monitor.dca_log().await?;

    println!("Positions: {}", positions.len());
    println!(
        "  {:<12} {:>12} {:>10} {:>12} {:>8} {:>19}",
        "market", "amount", "profit %", "value", "target", "first bought"
    );

    for p in positions.iter() {
        let target = match p.target_gain_value {
            Some(v) => format!("{:.2}", v),
            None => "-".to_string(),
        };
        let bought = if p.first_bought_date == min_date() {
            "never".to_string()
        } else {
            p.first_bought_date.format("%Y-%m-%d %H:%M:%S").to_string()
        };
        println!(
            "  {:<12} {:>12.4} {:>10.2} {:>12.8} {:>8} {:>19}",
            p.market, p.amount, p.profit_percent, p.current_value, target, bought
        );
    }

    Ok(())
}
