//! ptmon — refreshable aggregation cache over a trading bot's HTTP API.
//!
//! The bot's dashboard reads balances, historical sales, open positions and
//! buy-candidate scans through [`services::MonitorData`]: each record family
//! lives in its own cache slot with its own refresh cadence, rebuilt from
//! the upstream API on expiry and never published half-built. Rendering,
//! session handling and settings storage live with the dashboard host, not
//! here.

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod services;

pub use config::MonitorConfig;
pub use error::{AppError, Result};
pub use services::MonitorData;
