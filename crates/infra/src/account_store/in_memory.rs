use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use authorizer_accounts::Account;
use authorizer_core::{AccountId, ExpectedVersion};

use super::record::AccountRecord;
use super::r#trait::{AccountStore, StoreError};

/// In-memory account store holding JSON-encoded records.
///
/// Records go through the same encode/decode path a document database would,
/// so every load yields a fresh, unaliased aggregate.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    records: RwLock<HashMap<AccountId, Vec<u8>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn decode(bytes: &[u8]) -> Result<AccountRecord, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

impl AccountStore for InMemoryAccountStore {
    fn create(&self, account: &Account) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&AccountRecord::from_account(account))?;
        let account_id = account.id_typed();

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        if records.contains_key(&account_id) {
            return Err(StoreError::AlreadyExists(account_id));
        }

        records.insert(account_id, bytes);
        Ok(())
    }

    fn retrieve(
        &self,
        account_id: AccountId,
        now: DateTime<Utc>,
    ) -> Result<Option<Account>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        match records.get(&account_id) {
            Some(bytes) => Ok(Some(Self::decode(bytes)?.into_account(now))),
            None => Ok(None),
        }
    }

    fn update(
        &self,
        account: &Account,
        expected_version: ExpectedVersion,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(&AccountRecord::from_account(account))?;
        let account_id = account.id_typed();

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        let stored = records
            .get(&account_id)
            .ok_or(StoreError::NotFound(account_id))?;
        let current = Self::decode(stored)?.version;

        expected_version
            .check(current)
            .map_err(|e| StoreError::Concurrency(e.to_string()))?;

        records.insert(account_id, bytes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authorizer_accounts::Transaction;
    use authorizer_core::AggregateRoot;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 2, 13, h, m, s).unwrap()
    }

    #[test]
    fn retrieve_missing_account_is_none() {
        let store = InMemoryAccountStore::new();
        let found = store.retrieve(AccountId::default_account(), at(11, 0, 0)).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn create_twice_is_rejected() {
        let store = InMemoryAccountStore::new();
        let account = Account::open(AccountId::default_account(), true, 100);

        store.create(&account).unwrap();
        let err = store.create(&account).unwrap_err();

        assert!(matches!(err, StoreError::AlreadyExists(id) if id == account.id_typed()));
    }

    #[test]
    fn accounts_are_isolated_by_id() {
        let store = InMemoryAccountStore::new();
        let a = Account::open(AccountId::new(), true, 100);
        let b = Account::open(AccountId::new(), false, 500);
        store.create(&a).unwrap();
        store.create(&b).unwrap();

        let loaded = store.retrieve(b.id_typed(), at(11, 0, 0)).unwrap().unwrap();
        assert_eq!(loaded.ledger().max_limit(), 500);
        assert!(!loaded.ledger().active_card());
    }

    #[test]
    fn update_missing_account_is_not_found() {
        let store = InMemoryAccountStore::new();
        let account = Account::open(AccountId::default_account(), true, 100);

        let err = store.update(&account, ExpectedVersion::Any).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn stale_update_is_a_concurrency_error() {
        let store = InMemoryAccountStore::new();
        let id = AccountId::default_account();
        store.create(&Account::open(id, true, 100)).unwrap();

        let t = Transaction::new("Nike", 10, at(11, 0, 0));
        let mut first = store.retrieve(id, t.time).unwrap().unwrap();
        let mut second = store.retrieve(id, t.time).unwrap().unwrap();

        first.record_authorization(&t).unwrap();
        store.update(&first, ExpectedVersion::Exact(1)).unwrap();

        second.record_authorization(&t).unwrap();
        let err = store.update(&second, ExpectedVersion::Exact(1)).unwrap_err();
        assert!(matches!(err, StoreError::Concurrency(_)));

        let stored = store.retrieve(id, t.time).unwrap().unwrap();
        assert_eq!(stored.ledger().available_limit(), 90);
        assert_eq!(stored.version(), 2);
    }
}
