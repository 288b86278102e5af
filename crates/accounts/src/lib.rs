//! Account authorization domain.
//!
//! Pure decision logic only: no IO, no persistence, no transport. The ledger,
//! the spending-control rules with their usage accumulators, and the
//! authorization history all live inside the `Account` aggregate and are
//! owned by value.

pub mod account;
pub mod accumulator;
pub mod ledger;
pub mod rule;
pub mod transaction;
pub mod violation;

pub use account::{Account, DOUBLED_TRANSACTION_WINDOW_MINUTES, TransactionAuthorization};
pub use accumulator::Accumulator;
pub use ledger::Ledger;
pub use rule::{
    HIGH_FREQUENCY_RULE_NAME, HIGH_FREQUENCY_THRESHOLD, HIGH_FREQUENCY_VIOLATION,
    HIGH_FREQUENCY_WINDOW_MINUTES, Rule, RuleKind, SpendingControl,
};
pub use transaction::Transaction;
pub use violation::{Violation, Violations};
