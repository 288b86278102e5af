//! Infrastructure layer: account storage, request orchestration, configuration.

pub mod account_store;
pub mod config;
pub mod services;


pub use account_store::{AccountRecord, AccountStore, InMemoryAccountStore, StoreError};
pub use config::{AuthorizerConfig, ConfigError};
pub use services::{
    AccountService, AuthorizationService, Decision, InitializeAccount, ServiceError,
    StorageFailurePolicy,
};
