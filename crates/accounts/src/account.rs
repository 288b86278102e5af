//! Account aggregate: ledger + spending control + authorization history.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use authorizer_core::{AccountId, AggregateRoot, DomainResult};

use crate::ledger::Ledger;
use crate::rule::SpendingControl;
use crate::transaction::Transaction;
use crate::violation::{Violation, Violations};

/// Two identical purchases closer than this are considered duplicates.
pub const DOUBLED_TRANSACTION_WINDOW_MINUTES: i64 = 2;

/// One accepted transaction (immutable history entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAuthorization {
    pub merchant: String,
    pub amount: i64,
    /// Available limit right before this transaction was debited.
    pub available_limit: i64,
    pub time: DateTime<Utc>,
}

/// Aggregate root: Account.
///
/// History is append-only and kept in arrival order, which is not necessarily
/// ordered by transaction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    ledger: Ledger,
    spending_control: SpendingControl,
    authorizations: Vec<TransactionAuthorization>,
    version: u64,
}

impl Account {
    /// Brand new account with the built-in spending control and no history.
    pub fn open(id: AccountId, active_card: bool, max_limit: i64) -> Self {
        Self {
            id,
            ledger: Ledger::new(active_card, max_limit),
            spending_control: SpendingControl::default_rules(),
            authorizations: Vec::new(),
            version: 1,
        }
    }

    /// Account restored from storage.
    pub fn rehydrate(
        id: AccountId,
        ledger: Ledger,
        spending_control: SpendingControl,
        authorizations: Vec<TransactionAuthorization>,
        version: u64,
    ) -> Self {
        Self {
            id,
            ledger,
            spending_control,
            authorizations,
            version,
        }
    }

    pub fn id_typed(&self) -> AccountId {
        self.id
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn spending_control(&self) -> &SpendingControl {
        &self.spending_control
    }

    pub fn authorizations(&self) -> &[TransactionAuthorization] {
        &self.authorizations
    }

    /// Resolve every rule's window expiry as of `now`.
    pub fn refresh(&mut self, now: DateTime<Utc>) {
        self.spending_control.refresh(now);
    }

    /// Run the limit, rule and idempotency checks, in that order.
    ///
    /// Rules always record the transaction in their accumulators, so this
    /// mutates the account even when violations are returned. The ledger and
    /// history are left untouched.
    pub fn validate(&mut self, transaction: &Transaction) -> Violations {
        let mut violations = Violations::new();

        violations.add(self.check_limit(transaction));
        violations.extend(self.spending_control.evaluate(transaction));
        violations.add(self.find_doubled(transaction));

        violations
    }

    pub fn check_limit(&self, transaction: &Transaction) -> Option<Violation> {
        if self.ledger.has_funds_for(transaction.amount) {
            None
        } else {
            Some(Violation::InsufficientLimit)
        }
    }

    /// Look back through history, newest first, for the same merchant and
    /// amount within the duplicate window.
    ///
    /// The scan stops at the first entry more than two minutes older than the
    /// transaction. A gap of exactly two minutes still counts.
    pub fn find_doubled(&self, transaction: &Transaction) -> Option<Violation> {
        let window = Duration::minutes(DOUBLED_TRANSACTION_WINDOW_MINUTES);

        for entry in self.authorizations.iter().rev() {
            if transaction.time - entry.time > window {
                return None;
            }
            if entry.merchant == transaction.merchant && entry.amount == transaction.amount {
                return Some(Violation::DoubledTransaction);
            }
        }

        None
    }

    /// Accept a validated transaction: append it to the history and debit
    /// the ledger.
    pub fn record_authorization(&mut self, transaction: &Transaction) -> DomainResult<()> {
        let available_limit = self.ledger.available_limit();
        self.ledger.debit(transaction.amount)?;

        self.authorizations.push(TransactionAuthorization {
            merchant: transaction.merchant.clone(),
            amount: transaction.amount,
            available_limit,
            time: transaction.time,
        });

        self.version += 1;
        Ok(())
    }
}

impl AggregateRoot for Account {
    type Id = AccountId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}
