//! Transaction authorization engine.

use tracing::{debug, info};

use authorizer_accounts::{Transaction, Violation, Violations};
use authorizer_core::{AccountId, AggregateRoot, ExpectedVersion};

use crate::account_store::AccountStore;

use super::{Decision, ServiceError, StorageFailurePolicy, load_account};

#[derive(Debug)]
pub struct AuthorizationService<S> {
    store: S,
    account_id: AccountId,
    storage_failures: StorageFailurePolicy,
}

impl<S> AuthorizationService<S> {
    pub fn new(store: S, account_id: AccountId) -> Self {
        Self {
            store,
            account_id,
            storage_failures: StorageFailurePolicy::default(),
        }
    }

    pub fn with_storage_failures(mut self, policy: StorageFailurePolicy) -> Self {
        self.storage_failures = policy;
        self
    }
}

impl<S: AccountStore> AuthorizationService<S> {
    /// Decide whether `transaction` may be authorized.
    ///
    /// A missing account or an inactive card ends the request on its own.
    /// Otherwise the limit, rule and duplicate checks all run and every
    /// violation is reported, in that order. Only accepted transactions are
    /// persisted; a refused one still returns the account with its rule
    /// accumulators advanced.
    pub fn authorize(&self, transaction: &Transaction) -> Result<Decision, ServiceError> {
        let loaded = load_account(
            &self.store,
            self.account_id,
            transaction.time,
            self.storage_failures,
        )?;

        let Some(mut account) = loaded else {
            debug!(account_id = %self.account_id, "transaction before account initialization");
            return Ok(Decision::rejected(
                None,
                Violations::single(Violation::AccountNotInitialized),
            ));
        };

        if !account.ledger().active_card() {
            return Ok(Decision::rejected(
                Some(account),
                Violations::single(Violation::CardNotActive),
            ));
        }

        let loaded_version = account.version();
        let violations = account.validate(transaction);

        if !violations.is_empty() {
            info!(
                account_id = %self.account_id,
                merchant = %transaction.merchant,
                amount = transaction.amount,
                violations = %violations,
                "transaction refused"
            );
            return Ok(Decision::rejected(Some(account), violations));
        }

        account.record_authorization(transaction)?;
        self.storage_failures.absorb(
            "update",
            self.account_id,
            self.store
                .update(&account, ExpectedVersion::Exact(loaded_version)),
        )?;

        info!(
            account_id = %self.account_id,
            merchant = %transaction.merchant,
            amount = transaction.amount,
            available_limit = account.ledger().available_limit(),
            "transaction authorized"
        );
        Ok(Decision::accepted(account))
    }
}
