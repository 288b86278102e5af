use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Incoming purchase to be authorized (transient, never persisted as such).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub merchant: String,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// Business time reported by the caller; not necessarily monotonic.
    pub time: DateTime<Utc>,
}

impl Transaction {
    pub fn new(merchant: impl Into<String>, amount: i64, time: DateTime<Utc>) -> Self {
        Self {
            merchant: merchant.into(),
            amount,
            time,
        }
    }
}
