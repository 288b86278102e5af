//! Business outcomes that refuse (or flag) a request.
//!
//! Violations are data, not errors: every request produces a possibly empty,
//! ordered list of them.

use serde::{Serialize, Serializer};

/// A named reason an init or transaction request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Violation {
    AccountNotInitialized,
    CardNotActive,
    InsufficientLimit,
    AccountAlreadyInitialized,
    DoubledTransaction,
    /// Raised by a spending-control rule; carries the rule's configured code.
    Rule(String),
}

impl Violation {
    /// Stable wire code.
    pub fn code(&self) -> &str {
        match self {
            Violation::AccountNotInitialized => "account-not-initialized",
            Violation::CardNotActive => "card-not-active",
            Violation::InsufficientLimit => "insufficient-limit",
            Violation::AccountAlreadyInitialized => "account-already-initialized",
            Violation::DoubledTransaction => "doubled-transaction",
            Violation::Rule(code) => code,
        }
    }
}

impl core::fmt::Display for Violation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Ordered list of violations for one request.
///
/// Order is significant: limit, then rules in rule order, then idempotency.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(violation: Violation) -> Self {
        Self(vec![violation])
    }

    /// Push when present; absent checks contribute nothing.
    pub fn add(&mut self, violation: Option<Violation>) {
        if let Some(v) = violation {
            self.0.push(v);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn codes(&self) -> Vec<&str> {
        self.0.iter().map(Violation::code).collect()
    }
}

impl Extend<Violation> for Violations {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl core::fmt::Display for Violations {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.codes().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_bare_codes_in_order() {
        let mut violations = Violations::new();
        violations.add(Some(Violation::InsufficientLimit));
        violations.add(None);
        violations.extend([
            Violation::Rule("high-frequency-small-interval".to_string()),
            Violation::DoubledTransaction,
        ]);

        let json = serde_json::to_string(&violations).unwrap();
        assert_eq!(
            json,
            r#"["insufficient-limit","high-frequency-small-interval","doubled-transaction"]"#
        );
    }

    #[test]
    fn empty_list_serializes_as_empty_array() {
        assert_eq!(serde_json::to_string(&Violations::new()).unwrap(), "[]");
    }
}
