//! Persisted representation of the account aggregate.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use authorizer_accounts::{
    Account, Accumulator, Ledger, Rule, RuleKind, SpendingControl, TransactionAuthorization,
};
use authorizer_core::{AccountId, AggregateRoot};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub active: bool,
    pub max_limit: i64,
    pub available_limit: i64,
}

/// Accumulator state exactly as last written; expiry is not applied here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccumulatorRecord {
    pub duration_ms: i64,
    pub current_period_used: i64,
    pub current_period_spend: i64,
    pub period_ends_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub usage_limit: i64,
    pub accumulator: AccumulatorRecord,
    pub rule_violation: String,
}

/// One stored account document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: AccountId,
    pub version: u64,
    pub ledger: LedgerRecord,
    pub rules: Vec<RuleRecord>,
    pub transactions: Vec<TransactionAuthorization>,
}

impl AccountRecord {
    pub fn from_account(account: &Account) -> Self {
        let ledger = account.ledger();

        let rules = account
            .spending_control()
            .rules()
            .iter()
            .map(|rule| {
                let acc = rule.accumulator();
                RuleRecord {
                    name: rule.name().to_string(),
                    kind: rule.kind(),
                    usage_limit: rule.usage_limit_threshold(),
                    accumulator: AccumulatorRecord {
                        duration_ms: acc.window().num_milliseconds(),
                        current_period_used: acc.period_used(),
                        current_period_spend: acc.period_spend(),
                        period_ends_date: acc.period_ends_at(),
                    },
                    rule_violation: rule.violation_code().to_string(),
                }
            })
            .collect();

        Self {
            account_id: account.id_typed(),
            version: account.version(),
            ledger: LedgerRecord {
                active: ledger.active_card(),
                max_limit: ledger.max_limit(),
                available_limit: ledger.available_limit(),
            },
            rules,
            transactions: account.authorizations().to_vec(),
        }
    }

    /// Rebuild the aggregate as seen at `now`, resetting expired windows.
    pub fn into_account(self, now: DateTime<Utc>) -> Account {
        let rules = self
            .rules
            .into_iter()
            .map(|rule| {
                let acc = rule.accumulator;
                let accumulator = Accumulator::rebuild(
                    now,
                    Duration::milliseconds(acc.duration_ms),
                    acc.current_period_used,
                    acc.current_period_spend,
                    acc.period_ends_date,
                );
                Rule::from_parts(
                    rule.name,
                    rule.kind,
                    rule.usage_limit,
                    accumulator,
                    rule.rule_violation,
                )
            })
            .collect();

        Account::rehydrate(
            self.account_id,
            Ledger::from_parts(
                self.ledger.active,
                self.ledger.max_limit,
                self.ledger.available_limit,
            ),
            SpendingControl::new(rules),
            self.transactions,
            self.version,
        )
    }
}
