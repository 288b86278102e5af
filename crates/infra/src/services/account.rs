//! Account lifecycle: one-time initialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use authorizer_accounts::{Account, Violation, Violations};
use authorizer_core::AccountId;

use crate::account_store::AccountStore;

use super::{Decision, ServiceError, StorageFailurePolicy, load_account};

/// Command: InitializeAccount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitializeAccount {
    pub active_card: bool,
    pub max_limit: i64,
    pub requested_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AccountService<S> {
    store: S,
    account_id: AccountId,
    storage_failures: StorageFailurePolicy,
}

impl<S> AccountService<S> {
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

impl<S: AccountStore> AccountService<S> {
    /// Create the account unless it already exists.
    ///
    /// A second initialization returns the existing account untouched with
    /// `account-already-initialized`.
    pub fn init_account(&self, cmd: &InitializeAccount) -> Result<Decision, ServiceError> {
        let existing = load_account(
            &self.store,
            self.account_id,
            cmd.requested_at,
            self.storage_failures,
        )?;

        if let Some(account) = existing {
            info!(account_id = %self.account_id, "account already initialized");
            return Ok(Decision::rejected(
                Some(account),
                Violations::single(Violation::AccountAlreadyInitialized),
            ));
        }

        let account = Account::open(self.account_id, cmd.active_card, cmd.max_limit);
        self.storage_failures
            .absorb("create", self.account_id, self.store.create(&account))?;

        info!(
            account_id = %self.account_id,
            active_card = cmd.active_card,
            max_limit = cmd.max_limit,
            "account initialized"
        );
        Ok(Decision::accepted(account))
    }
}
