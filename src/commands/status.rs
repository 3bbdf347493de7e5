use super::{exit_with, monitor_from_env};

pub async fn run() {
    let monitor = match monitor_from_env() {
        Ok(monitor) => monitor,
        Err(e) => exit_with(e),
    };

    if let Err(e) = show_status(&monitor).await {
        exit_with(e);
    }
}

async fn show_status(monitor: &crate::services::MonitorData) -> crate::error::Result<()> {
    let summary = monitor.summary().await?;
    let properties = monitor.properties().await?;
    let tcv = monitor.total_current_value().await?;

    println!("Instance");
    println!("  currency:  {}", properties.currency);
    println!("  port:      {}", properties.port);
    println!("  shorting:  {}", properties.shorting);
    println!("  margin:    {}", properties.margin);
    println!("  leverage:  {}", properties.is_leverage_exchange);
    println!("  uptime:    {}h", properties.up_time / 3_600_000);
    println!();
    println!("Balances ({})", summary.market);
    println!("  available: {:.8}", summary.balance);
    println!("  pairs:     {:.8}", summary.pairs_value);
    println!("  dca:       {:.8}", summary.dca_value);
    println!("  pending:   {:.8}", summary.pending_value);
    println!("  dust:      {:.8}", summary.dust_value);
    println!();
    println!("Total current value: {:.8}", tcv);

    Ok(())
}
