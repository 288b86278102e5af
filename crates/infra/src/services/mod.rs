//! Request orchestration for the account aggregate.
//!
//! Each request runs the same pipeline:
//!
//! ```text
//! request
//!   ↓
//! 1. Retrieve the account as of the request time (expired windows reset)
//!   ↓
//! 2. Decide in memory (pure domain logic)
//!   ↓
//! 3. Persist on success (whole record, optimistic version check)
//!   ↓
//! 4. Return the account and the ordered violations
//! ```
//!
//! Requests for one account must be applied one at a time. The services hold
//! no state of their own beyond the injected store.

pub mod account;
pub mod authorization;

pub use account::{AccountService, InitializeAccount};
pub use authorization::AuthorizationService;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::warn;

use authorizer_accounts::{Account, Violations};
use authorizer_core::{AccountId, DomainError};

use crate::account_store::{AccountStore, StoreError};

/// Outcome of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// The account as it stands after the request, if one exists.
    pub account: Option<Account>,
    pub violations: Violations,
}

impl Decision {
    pub fn accepted(account: Account) -> Self {
        Self {
            account: Some(account),
            violations: Violations::new(),
        }
    }

    pub fn rejected(account: Option<Account>, violations: Violations) -> Self {
        Self {
            account,
            violations,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage failure: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// What to do when the store fails on create/retrieve/update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageFailurePolicy {
    /// Log and carry on as if the store had nothing (retrieve) or had
    /// accepted the write (create/update).
    #[default]
    BestEffort,
    /// Surface the failure to the caller.
    Strict,
}

impl StorageFailurePolicy {
    /// Apply the policy to a store result. `Ok(None)` means a tolerated fault.
    pub(crate) fn absorb<T>(
        self,
        operation: &'static str,
        account_id: AccountId,
        result: Result<T, StoreError>,
    ) -> Result<Option<T>, ServiceError> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => match self {
                StorageFailurePolicy::Strict => Err(err.into()),
                StorageFailurePolicy::BestEffort => {
                    warn!(
                        account_id = %account_id,
                        operation,
                        error = %err,
                        "storage failure ignored"
                    );
                    Ok(None)
                }
            },
        }
    }
}

pub(crate) fn load_account<S: AccountStore>(
    store: &S,
    account_id: AccountId,
    now: DateTime<Utc>,
    policy: StorageFailurePolicy,
) -> Result<Option<Account>, ServiceError> {
    let loaded = policy.absorb("retrieve", account_id, store.retrieve(account_id, now))?;
    Ok(loaded.flatten())
}
