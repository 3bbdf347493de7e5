use super::{exit_with, monitor_from_env};
use crate::services::aggregates;

/// How many of the newest daily gain rows to print.
const DAILY_GAIN_ROWS: usize = 14;

pub async fn run() {
    let monitor = match monitor_from_env() {
        Ok(monitor) => monitor,
        Err(e) => exit_with(e),
    };

    if let Err(e) = show_sales(&monitor).await {
        exit_with(e);
    }
}

async fn show_sales(monitor: &crate::services::MonitorData) -> crate::error::Result<()> {
    let sells = monitor.sell_log().await?;
    let positions = monitor.dca_log().await?;
    let today = monitor.clock().now_local().date();
    let config = monitor.config();

    println!("Sales: {} total", sells.len());
    println!("  today:        {}", monitor.sell_log_today().await?.len());
    println!("  yesterday:    {}", monitor.sell_log_yesterday().await?.len());
    println!("  last 7 days:  {}", monitor.sell_log_last_7_days().await?.len());
    println!("  last 30 days: {}", monitor.sell_log_last_30_days().await?.len());
    println!();

    println!("Top markets");
    for (market, profit) in aggregates::top_markets(&sells, config.max_top_markets) {
        println!("  {:<12} {:>14.8}", market, profit);
    }
    println!();

    println!("Daily gains");
    let gains = aggregates::daily_gains(config.start_balance, &sells, &[], &positions, today);
    for (date, gain) in gains.iter().take(DAILY_GAIN_ROWS) {
        println!("  {}  {:>7.2}%", date, gain);
    }

    println!();
    println!("Monthly gains");
    for (month, gain) in aggregates::monthly_gains(config.start_balance, &sells, &[], &positions, today) {
        println!("  {}  {:>7.2}%", month.format("%Y-%m"), gain);
    }

    Ok(())
}
