use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "ptmon")]
#[command(about = "Trading-bot monitor CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show account summary, instance properties and balances
    Status,
    /// Show sales history roll-ups (top markets, daily gains)
    Sales,
    /// Show open, pending and watch-only positions
    Bags,
    /// Show the latest buy-candidate scan
    Buys,
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => commands::status::run().await,
        Commands::Sales => commands::sales::run().await,
        Commands::Bags => commands::bags::run().await,
        Commands::Buys => commands::buys::run().await,
    }
}
