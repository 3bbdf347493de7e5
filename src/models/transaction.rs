use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A manual deposit or withdrawal recorded by the ledger collaborator.
/// Consumed by the snapshot-balance reconstruction; storage is owned
/// elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerTransaction {
    pub timestamp: DateTime<Utc>,
    /// Signed amount: positive deposit, negative withdrawal.
    pub amount: f64,
}
