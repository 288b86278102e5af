use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use authorizer_accounts::Account;
use authorizer_core::{AccountId, ExpectedVersion};

/// Account store operation error.
///
/// These are infrastructure faults. A missing account on `retrieve` is not one
/// of them: it is reported as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account {0} already exists")]
    AlreadyExists(AccountId),

    #[error("account {0} not found")]
    NotFound(AccountId),

    #[error("optimistic concurrency check failed: {0}")]
    Concurrency(String),

    #[error("record codec failed: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Load/save contract for the account aggregate.
///
/// ## Retrieve semantics
///
/// `retrieve(id, now)` rebuilds every rule accumulator as of `now` before
/// returning, so callers always evaluate against unexpired windows. It must
/// be called exactly once per evaluation with that evaluation's timestamp.
///
/// ## Update semantics
///
/// `update` replaces the whole record. The stored version must match
/// `expected_version`; the whole account is the unit of concurrency control.
pub trait AccountStore: Send + Sync {
    /// Persist a brand new account.
    fn create(&self, account: &Account) -> Result<(), StoreError>;

    /// Load the account as seen at `now`, or `None` if it was never created.
    fn retrieve(
        &self,
        account_id: AccountId,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError>;

    /// Replace the stored account.
    fn update(&self, account: &Account, expected_version: ExpectedVersion)
    -> Result<(), StoreError>;
}

impl<S> AccountStore for Arc<S>
where
    S: AccountStore + ?Sized,
{
    fn create(&self, account: &Account) -> Result<(), StoreError> {
        (**self).create(account)
    }

    fn retrieve(
        &self,
        account_id: AccountId,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        (**self).retrieve(account_id, now)
    }

    fn update(
        &self,
        account: &Account,
        expected_version: ExpectedVersion,
    ) -> Result<(), StoreError> {
        (**self).update(account, expected_version)
    }
}
