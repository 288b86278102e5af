//! Wire DTOs and mapping to/from domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use authorizer_accounts::{Transaction, Violations};
use authorizer_infra::Decision;

/// One request line. Exactly one of the fields is expected to be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Input {
    pub account: Option<AccountOperation>,
    pub transaction: Option<TransactionOperation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountOperation {
    pub active_card: bool,
    pub available_limit: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionOperation {
    pub merchant: String,
    pub amount: i64,
    pub time: DateTime<Utc>,
}

impl From<TransactionOperation> for Transaction {
    fn from(op: TransactionOperation) -> Self {
        Transaction::new(op.merchant, op.amount, op.time)
    }
}

/// Account fields echoed back; both are omitted when there is no account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct AccountOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_card: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_limit: Option<i64>,
}

/// One response line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Output {
    pub account: AccountOutput,
    pub violations: Violations,
}

impl From<Decision> for Output {
    fn from(decision: Decision) -> Self {
        let account = decision
            .account
            .map(|account| AccountOutput {
                active_card: Some(account.ledger().active_card()),
                available_limit: Some(account.ledger().available_limit()),
            })
            .unwrap_or_default();

        Self {
            account,
            violations: decision.violations,
        }
    }
}
