use super::{exit_with, monitor_from_env};

pub async fn run() {
    let monitor = match monitor_from_env() {
        Ok(monitor) => monitor,
        Err(e) => exit_with(e),
    };

    if let Err(e) = show_buys(&monitor).await {
        exit_with(e);
    }
}

async fn show_buys(monitor: &crate::services::MonitorData) -> crate::error::Result<()> {
    let candidates = monitor.buy_log().await?;

    println!("Buy candidates: {}", candidates.len());
    println!(
        "  {:<12} {:>12} {:>10} {:>12} {:>5} {:>8} {:>4}",
        "market", "price", "change %", "volume 24h", "true", "trailing", "som"
    );

    for c in candidates.iter() {
        println!(
            "  {:<12} {:>12.8} {:>10.2} {:>12.2} {:>2}/{:<2} {:>8} {:>4}",
            c.market,
            c.current_price,
            c.perc_change,
            c.volume_24h,
            c.true_strategy_count,
            c.buy_strategies.len(),
            if c.is_trailing { "yes" } else { "no" },
            if c.is_som { "yes" } else { "no" }
        );
    }

    Ok(())
}
