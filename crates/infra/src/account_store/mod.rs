//! Single-record account storage boundary.
//!
//! The store persists one `AccountRecord` per `AccountId` and translates
//! between it and the in-memory `Account` aggregate. Accumulator window
//! expiry is resolved while loading, using the caller's clock value.

pub mod in_memory;
pub mod record;
pub mod r#trait;

pub use in_memory::InMemoryAccountStore;
pub use r#trait::{AccountStore, StoreError};
pub use record::{AccountRecord, AccumulatorRecord, LedgerRecord, RuleRecord};
