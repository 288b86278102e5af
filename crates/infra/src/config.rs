//! Configuration loading and representation.
//!
//! The authorizer takes no command-line flags; the few knobs it has come from
//! the environment.

use thiserror::Error;

use authorizer_core::{AccountId, DomainError};

use crate::services::StorageFailurePolicy;

/// UUID of the account requests are applied to.
pub const ACCOUNT_ID_VAR: &str = "AUTHORIZER_ACCOUNT_ID";
/// `true` to turn storage faults into fatal errors.
pub const STRICT_STORAGE_VAR: &str = "AUTHORIZER_STRICT_STORAGE";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {var}: {source}")]
    InvalidAccountId {
        var: &'static str,
        #[source]
        source: DomainError,
    },

    #[error("invalid {var}: expected true or false, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthorizerConfig {
    pub account_id: AccountId,
    pub storage_failures: StorageFailurePolicy,
}

impl AuthorizerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let account_id = match lookup(ACCOUNT_ID_VAR) {
            Some(raw) if !raw.trim().is_empty() => {
                raw.parse::<AccountId>()
                    .map_err(|source| ConfigError::InvalidAccountId {
                        var: ACCOUNT_ID_VAR,
                        source,
                    })?
            }
            _ => AccountId::default_account(),
        };

        let strict = match lookup(STRICT_STORAGE_VAR) {
            Some(raw) => parse_flag(STRICT_STORAGE_VAR, &raw)?,
            None => false,
        };

        Ok(Self {
            account_id,
            storage_failures: if strict {
                StorageFailurePolicy::Strict
            } else {
                StorageFailurePolicy::BestEffort
            },
        })
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: raw.to_string(),
        }),
    }
}
